use std::{net::IpAddr, sync::Arc};

use anyhow::Context;
use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    Router,
};
use lidflow_core_contact_contracts::ContactService;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

mod errors;
mod extractors;
mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Contact> {
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Browser origins allowed to post the contact form. Empty means same
    /// origin only.
    pub allowed_origins: Arc<[String]>,
}

impl<Contact> RestServer<Contact>
where
    Contact: ContactService,
{
    pub fn new(contact: Contact, config: RestServerConfig) -> Self {
        Self { contact, config }
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let (host, port) = (self.config.host, self.config.port);
        let listener = TcpListener::bind((host, port))
            .await
            .with_context(|| format!("Failed to bind to {host}:{port}"))?;
        self.serve_with_listener(listener).await
    }

    /// Serve on an already bound listener, e.g. one bound to an ephemeral port.
    pub async fn serve_with_listener(self, listener: TcpListener) -> anyhow::Result<()> {
        let router = self.router()?;
        axum::serve(listener, router)
            .await
            .context("Failed to start HTTP server")
    }

    fn router(self) -> anyhow::Result<Router<()>> {
        let contact = Arc::new(self.contact);

        let contact_router = routes::contact::router(Arc::clone(&contact));
        let contact_router = match cors_layer(&self.config.allowed_origins)? {
            Some(cors) => contact_router.layer(cors),
            None => contact_router,
        };

        let router = Router::new()
            .merge(routes::health::router(contact))
            .merge(contact_router);

        let router = middlewares::panic_handler::add(router);
        let router = middlewares::trace::add(router);
        let router = middlewares::request_id::add(router);

        Ok(router)
    }
}

fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<Option<CorsLayer>> {
    if allowed_origins.is_empty() {
        return Ok(None);
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid allowed origin: {origin:?}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::POST])
            .allow_headers([CONTENT_TYPE]),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_disabled_without_origins() {
        assert!(cors_layer(&[]).unwrap().is_none());
    }

    #[test]
    fn cors_invalid_origin() {
        let err = cors_layer(&["https://lidflow.vercel.app\n".into()]).unwrap_err();
        assert!(err.to_string().contains("Invalid allowed origin"));
    }
}
