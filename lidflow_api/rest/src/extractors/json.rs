use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::Response,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::{error, INVALID_DATA_FORMAT};

/// Like [`axum::Json`], but any body which cannot be read (e.g. too large) or
/// deserialized (malformed json, empty body, wrong types) is rejected with
/// `422` and a generic message. The content type is not checked.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Response;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(request, state).await.map_err(|err| {
            debug!("Failed to read request body: {err}");
            error(StatusCode::UNPROCESSABLE_ENTITY, INVALID_DATA_FORMAT)
        })?;

        serde_json::from_slice(&body).map(Self).map_err(|err| {
            debug!("Failed to parse request body: {err}");
            error(StatusCode::UNPROCESSABLE_ENTITY, INVALID_DATA_FORMAT)
        })
    }
}
