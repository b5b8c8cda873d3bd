//! Submission side of the contact form: validates the form locally, posts it
//! to the contact form endpoint and exposes the outcome as a
//! [`SubmissionState`].

use std::sync::Arc;

use lidflow_models::contact::{ContactSubmission, ContactSubmissionError};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info};
use url::Url;

pub use crate::api::{
    ContactApi, ContactApiError, HttpContactApi, HttpContactApiConfig, CONTACT_PATH,
};
#[cfg(any(test, feature = "mock"))]
pub use crate::api::MockContactApi;

mod api;

/// Raw values of the contact form fields, as typed by the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormValues {
    pub name: String,
    pub contact: String,
    pub message: String,
}

impl ContactFormValues {
    pub fn clear(&mut self) {
        self.name.clear();
        self.contact.clear();
        self.message.clear();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Loading,
    Success,
    Error(SubmissionError),
}

/// Failure of a submission. The `Display` implementation is the message shown
/// to the visitor and never contains details of the underlying cause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("{0}")]
    Validation(#[from] ContactSubmissionError),
    #[error("Could not send your request. Please try again later.")]
    Rejected,
    #[error("Network error. Please contact us directly: {direct_contact_url}")]
    Network { direct_contact_url: Url },
}

#[derive(Debug, Clone)]
pub struct ContactFormConfig {
    /// Alternative channel offered to the visitor if the endpoint cannot be
    /// reached.
    pub direct_contact_url: Arc<Url>,
}

/// A single contact form instance.
#[derive(Debug)]
pub struct ContactForm<Api> {
    api: Api,
    config: ContactFormConfig,
    values: ContactFormValues,
    state: watch::Sender<SubmissionState>,
}

impl<Api> ContactForm<Api>
where
    Api: ContactApi,
{
    pub fn new(api: Api, config: ContactFormConfig) -> Self {
        Self {
            api,
            config,
            values: ContactFormValues::default(),
            state: watch::Sender::new(SubmissionState::Idle),
        }
    }

    pub fn values(&self) -> &ContactFormValues {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut ContactFormValues {
        &mut self.values
    }

    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    /// Returns a receiver which observes every state transition, including
    /// [`SubmissionState::Loading`] while [`ContactForm::submit`] is pending.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// Validates the current values and, if they are valid, sends them with
    /// exactly one request. The form is borrowed exclusively until the request
    /// has settled, so at most one submission per form is in flight.
    ///
    /// Values are cleared only if the submission succeeded.
    pub async fn submit(&mut self) -> SubmissionState {
        let submission = match ContactSubmission::parse(
            Some(self.values.name.clone()),
            Some(self.values.contact.clone()),
            Some(self.values.message.clone()),
        ) {
            Ok(submission) => submission,
            Err(err) => {
                debug!("Contact form is invalid: {err}");
                return self.set_state(SubmissionState::Error(err.into()));
            }
        };

        self.set_state(SubmissionState::Loading);

        let state = match self.api.send(&submission).await {
            Ok(()) => {
                info!("Contact form submitted");
                self.values.clear();
                SubmissionState::Success
            }
            Err(ContactApiError::Rejected { status, body }) => {
                error!(status, %body, "Contact form submission was rejected");
                SubmissionState::Error(SubmissionError::Rejected)
            }
            Err(ContactApiError::Network(err)) => {
                error!("Failed to submit contact form: {err:#}");
                SubmissionState::Error(SubmissionError::Network {
                    direct_contact_url: (*self.config.direct_contact_url).clone(),
                })
            }
        };

        self.set_state(state)
    }

    fn set_state(&self, state: SubmissionState) -> SubmissionState {
        self.state.send_replace(state.clone());
        state
    }
}
