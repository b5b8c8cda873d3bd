use lidflow_core_contact_contracts::{ContactSendMessageError, ContactService};
use lidflow_extern_contracts::telegram::{TelegramApiService, TelegramSendMessageError};
use lidflow_models::{contact::ContactSubmission, telegram::TelegramMessage};
use lidflow_shared_contracts::relay_config::RelayConfigService;
use tracing::{error, info};
use url::Url;

/// Shown instead of the message if the sender left it empty.
const EMPTY_MESSAGE_PLACEHOLDER: &str = "-";

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<TelegramApi, RelayConfig> {
    telegram_api: TelegramApi,
    relay_config: RelayConfig,
}

impl<TelegramApi, RelayConfig> ContactServiceImpl<TelegramApi, RelayConfig> {
    pub fn new(telegram_api: TelegramApi, relay_config: RelayConfig) -> Self {
        Self {
            telegram_api,
            relay_config,
        }
    }
}

impl<TelegramApi, RelayConfig> ContactService for ContactServiceImpl<TelegramApi, RelayConfig>
where
    TelegramApi: TelegramApiService,
    RelayConfig: RelayConfigService,
{
    async fn send_message(
        &self,
        submission: ContactSubmission,
    ) -> Result<(), ContactSendMessageError> {
        let Some(credentials) = self.relay_config.telegram_credentials() else {
            error!(
                "Telegram bot token or chat id is not configured, dropping contact form submission"
            );
            return Err(ContactSendMessageError::NotConfigured);
        };

        let message = TelegramMessage {
            chat_id: credentials.chat_id,
            text: format_message(&submission, &self.relay_config.site_url()),
        };

        match self
            .telegram_api
            .send_message(&credentials.bot_token, &message)
            .await
        {
            Ok(()) => {
                info!("Relayed contact form submission");
                Ok(())
            }
            Err(TelegramSendMessageError::Rejected { status, body }) => {
                error!(status, %body, "Telegram rejected contact form submission");
                Err(ContactSendMessageError::Send)
            }
            Err(TelegramSendMessageError::Other(err)) => {
                error!("Failed to relay contact form submission: {err:#}");
                Err(ContactSendMessageError::Send)
            }
        }
    }

    fn is_configured(&self) -> bool {
        self.relay_config.telegram_credentials().is_some()
    }
}

fn format_message(submission: &ContactSubmission, site_url: &Url) -> String {
    let message = match submission.message.is_empty() {
        true => EMPTY_MESSAGE_PLACEHOLDER,
        false => submission.message.as_str(),
    };

    format!(
        "🆕 New request from the website\n\nName: {}\nContact: {}\nMessage: {message}\n\nSite: {site_url}",
        submission.name.as_str(),
        submission.contact.as_str(),
    )
}
