use std::{future::Future, sync::Arc, time::Duration};

use anyhow::Context;
use lidflow_models::contact::ContactSubmission;
use lidflow_utils::lidflow_version;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Path of the contact form endpoint, relative to the site's base url.
pub const CONTACT_PATH: &str = "api/telegram";

/// Transport used by [`ContactForm`](crate::ContactForm) to deliver a
/// validated submission to the contact form endpoint.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait ContactApi: Send + Sync + 'static {
    /// Posts the submission. Performs exactly one request.
    fn send(
        &self,
        submission: &ContactSubmission,
    ) -> impl Future<Output = Result<(), ContactApiError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactApiError {
    /// The endpoint answered with a non-success status code.
    #[error("Contact form endpoint responded with status {status}: {body}")]
    Rejected { status: u16, body: String },
    /// No response was received.
    #[error(transparent)]
    Network(#[from] anyhow::Error),
}

#[cfg(any(test, feature = "mock"))]
impl MockContactApi {
    pub fn with_send(
        mut self,
        submission: ContactSubmission,
        result: Result<(), ContactApiError>,
    ) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(|_| Box::pin(std::future::ready(result)));
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpContactApi {
    config: HttpContactApiConfig,
    http: reqwest::Client,
}

#[derive(Debug, Clone)]
pub struct HttpContactApiConfig {
    endpoint: Arc<Url>,
    timeout: Duration,
}

impl HttpContactApiConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// `base_url` is treated as a directory, `https://host/landing` and
    /// `https://host/landing/` both post to `https://host/landing/api/telegram`.
    pub fn new(base_url: &Url, timeout: Duration) -> anyhow::Result<Self> {
        let mut base_url = base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let endpoint = base_url
            .join(CONTACT_PATH)
            .with_context(|| format!("Failed to build contact form endpoint from {base_url}"))?;
        Ok(Self {
            endpoint: endpoint.into(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl HttpContactApi {
    pub fn new(config: HttpContactApiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!("Lidflow Contact Form (Version {})", lidflow_version()))
            .build()
            .context("Failed to build http client")?;
        Ok(Self { config, http })
    }
}

impl ContactApi for HttpContactApi {
    async fn send(&self, submission: &ContactSubmission) -> Result<(), ContactApiError> {
        let response = self
            .http
            .post(self.config.endpoint.as_str())
            .json(submission)
            .timeout(self.config.timeout)
            .send()
            .await
            .context("Failed to send contact form submission")?;

        let status = response.status();
        if status.is_success() {
            debug!(%status, "Contact form endpoint accepted the submission");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(ContactApiError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
