use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use lidflow_core_contact_contracts::ContactService;
use serde::Serialize;

pub fn router(service: Arc<impl ContactService>) -> Router<()> {
    Router::new()
        .route("/health", routing::get(health))
        .with_state(service)
}

#[derive(Serialize)]
struct HealthResponse {
    http: bool,
    relay_configured: bool,
}

async fn health(service: State<Arc<impl ContactService>>) -> Response {
    let relay_configured = service.is_configured();

    let status = if relay_configured {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let response = HealthResponse {
        http: true,
        relay_configured,
    };

    (status, Json(response)).into_response()
}
