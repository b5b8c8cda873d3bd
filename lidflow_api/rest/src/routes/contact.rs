use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use lidflow_core_contact_contracts::{ContactSendMessageError, ContactService};
use lidflow_models::contact::ContactSubmission;
use tracing::debug;

use crate::{
    errors::{error, FAILED_TO_DELIVER, NOT_CONFIGURED},
    extractors::json::JsonBody,
    models::contact::{ApiContactSendMessageResponse, ApiContactSubmission},
};

pub const CONTACT_ROUTE: &str = "/api/telegram";

pub fn router(service: Arc<impl ContactService>) -> Router<()> {
    Router::new()
        .route(CONTACT_ROUTE, routing::post(send_message))
        .with_state(service)
}

async fn send_message(
    service: State<Arc<impl ContactService>>,
    JsonBody(submission): JsonBody<ApiContactSubmission>,
) -> Response {
    let submission = match ContactSubmission::try_from(submission) {
        Ok(submission) => submission,
        Err(err) => {
            debug!("Rejected contact form submission: {err}");
            return error(StatusCode::UNPROCESSABLE_ENTITY, err.to_string());
        }
    };

    match service.send_message(submission).await {
        Ok(()) => Json(ApiContactSendMessageResponse { ok: true }).into_response(),
        Err(ContactSendMessageError::NotConfigured) => {
            error(StatusCode::INTERNAL_SERVER_ERROR, NOT_CONFIGURED)
        }
        Err(ContactSendMessageError::Send) => error(StatusCode::BAD_GATEWAY, FAILED_TO_DELIVER),
    }
}
