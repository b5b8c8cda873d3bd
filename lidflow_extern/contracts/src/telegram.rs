use std::future::Future;

use lidflow_models::telegram::TelegramMessage;
use thiserror::Error;

/// Client for the Telegram Bot API.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TelegramApiService: Send + Sync + 'static {
    /// Sends a text message to a chat. Performs exactly one request.
    fn send_message(
        &self,
        bot_token: &str,
        message: &TelegramMessage,
    ) -> impl Future<Output = Result<(), TelegramSendMessageError>> + Send;
}

#[derive(Debug, Error)]
pub enum TelegramSendMessageError {
    /// The Bot API answered with a non-success status code.
    #[error("Telegram rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
    /// The request could not be completed, e.g. because of a connection error
    /// or a timeout.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockTelegramApiService {
    pub fn with_send_message(
        mut self,
        bot_token: String,
        message: TelegramMessage,
        result: Result<(), TelegramSendMessageError>,
    ) -> Self {
        self.expect_send_message()
            .once()
            .withf(move |token, msg| token == bot_token.as_str() && *msg == message)
            .return_once(|_, _| Box::pin(std::future::ready(result)));
        self
    }
}
