use lidflow_models::contact::{ContactSubmission, ContactSubmissionError};
use serde::{Deserialize, Serialize};

/// Contact form as posted by the landing page. Fields are optional here so
/// that missing fields are reported by the validation rules instead of being
/// treated as malformed json.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiContactSubmission {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub message: Option<String>,
}

impl TryFrom<ApiContactSubmission> for ContactSubmission {
    type Error = ContactSubmissionError;

    fn try_from(value: ApiContactSubmission) -> Result<Self, Self::Error> {
        ContactSubmission::parse(value.name, value.contact, value.message)
    }
}

#[derive(Debug, Serialize)]
pub struct ApiContactSendMessageResponse {
    pub ok: bool,
}
