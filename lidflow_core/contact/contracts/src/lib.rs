use std::future::Future;

use lidflow_models::contact::ContactSubmission;
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactService: Send + Sync + 'static {
    /// Relay a validated contact form submission to the studio's Telegram
    /// chat. Every call attempts exactly one delivery.
    fn send_message(
        &self,
        submission: ContactSubmission,
    ) -> impl Future<Output = Result<(), ContactSendMessageError>> + Send;

    /// Whether the relay credentials are currently configured.
    fn is_configured(&self) -> bool;
}

#[derive(Debug, Error)]
pub enum ContactSendMessageError {
    #[error("The contact relay is not configured.")]
    NotConfigured,
    #[error("Failed to deliver message.")]
    Send,
}

#[cfg(feature = "mock")]
impl MockContactService {
    pub fn with_send_message(
        mut self,
        submission: ContactSubmission,
        result: Result<(), ContactSendMessageError>,
    ) -> Self {
        self.expect_send_message()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(|_| Box::pin(std::future::ready(result)));
        self
    }

    pub fn with_is_configured(mut self, result: bool) -> Self {
        self.expect_is_configured().once().return_const(result);
        self
    }
}
