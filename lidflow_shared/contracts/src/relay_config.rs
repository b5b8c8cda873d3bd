use lidflow_models::telegram::TelegramCredentials;
use url::Url;

/// Read-only access to the configuration of the contact relay. Values are
/// looked up on every call, so a deployment can rotate them without a restart.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait RelayConfigService: Send + Sync + 'static {
    /// Returns `None` if the bot token or the chat id is not configured.
    fn telegram_credentials(&self) -> Option<TelegramCredentials>;

    /// Base url of the landing page, referenced in relayed messages.
    fn site_url(&self) -> Url;
}

#[cfg(feature = "mock")]
impl MockRelayConfigService {
    pub fn with_telegram_credentials(mut self, result: Option<TelegramCredentials>) -> Self {
        self.expect_telegram_credentials()
            .once()
            .return_once(move || result);
        self
    }

    pub fn with_site_url(mut self, result: Url) -> Self {
        self.expect_site_url().once().return_once(move || result);
        self
    }
}
