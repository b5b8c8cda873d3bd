use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Context};
use lidflow_extern_contracts::telegram::{TelegramApiService, TelegramSendMessageError};
use lidflow_models::telegram::TelegramMessage;
use tracing::debug;
use url::Url;

use crate::http::HttpClient;

/// https://core.telegram.org/bots/api#making-requests
const API_ENDPOINT: &str = "https://api.telegram.org/";

#[derive(Debug, Clone, Default)]
pub struct TelegramApiServiceImpl {
    config: TelegramApiServiceConfig,
    http: HttpClient,
}

#[derive(Debug, Clone)]
pub struct TelegramApiServiceConfig {
    api_endpoint: Arc<Url>,
    timeout: Duration,
}

impl TelegramApiServiceConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(api_endpoint_override: Option<Url>, timeout: Duration) -> Self {
        Self {
            api_endpoint: api_endpoint_override
                .unwrap_or_else(default_api_endpoint)
                .into(),
            timeout,
        }
    }
}

impl Default for TelegramApiServiceConfig {
    fn default() -> Self {
        Self::new(None, Self::DEFAULT_TIMEOUT)
    }
}

fn default_api_endpoint() -> Url {
    API_ENDPOINT.parse().unwrap()
}

impl TelegramApiServiceImpl {
    pub fn new(config: TelegramApiServiceConfig) -> Self {
        Self {
            config,
            http: HttpClient::default(),
        }
    }

    /// `<endpoint>/bot<token>/sendMessage`. The token contains a `:`, so it is
    /// pushed as a path segment instead of being joined as a relative url.
    fn send_message_url(&self, bot_token: &str) -> anyhow::Result<Url> {
        let mut url = (*self.config.api_endpoint).clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("Telegram api endpoint cannot be a base url"))?
            .pop_if_empty()
            .push(&format!("bot{bot_token}"))
            .push("sendMessage");
        Ok(url)
    }
}

impl TelegramApiService for TelegramApiServiceImpl {
    async fn send_message(
        &self,
        bot_token: &str,
        message: &TelegramMessage,
    ) -> Result<(), TelegramSendMessageError> {
        let url = self.send_message_url(bot_token)?;

        // reqwest errors include the request url, which contains the bot token
        let response = self
            .http
            .post(url)
            .json(message)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|err| {
                let timeout = err.is_timeout();
                let err = anyhow::Error::new(err.without_url());
                match timeout {
                    true => err.context("Telegram sendMessage request timed out"),
                    false => err.context("Failed to send Telegram sendMessage request"),
                }
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(chat_id = %message.chat_id, "Telegram accepted the message");
            return Ok(());
        }

        let body = response
            .text()
            .await
            .map_err(|err| err.without_url())
            .context("Failed to read Telegram error response")?;

        Err(TelegramSendMessageError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_message_url() {
        let sut = TelegramApiServiceImpl::default();
        let url = sut.send_message_url("123456:ABC-DEF").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.telegram.org/bot123456:ABC-DEF/sendMessage"
        );
    }

    #[test]
    fn send_message_url_with_path() {
        let config = TelegramApiServiceConfig::new(
            Some("http://127.0.0.1:8003/telegram".parse().unwrap()),
            Duration::from_secs(1),
        );
        let sut = TelegramApiServiceImpl::new(config);
        let url = sut.send_message_url("1:x").unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8003/telegram/bot1:x/sendMessage"
        );
    }
}
