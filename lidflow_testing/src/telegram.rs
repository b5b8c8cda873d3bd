use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use lidflow_models::telegram::TelegramMessage;
use serde::Serialize;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::info;
use url::Url;

const SEND_MESSAGE_ROUTE: &str = "/:bot/sendMessage";

/// Fake Telegram Bot API which accepts messages for a single bot and chat and
/// records everything it accepted.
#[derive(Debug, Clone)]
pub struct FakeTelegram {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    bot_token: String,
    chat_id: String,
    delay: Option<Duration>,
    messages: Mutex<Vec<TelegramMessage>>,
}

impl FakeTelegram {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self::with_delay(bot_token, chat_id, None)
    }

    /// Like [`FakeTelegram::new`], but every response is delayed.
    pub fn with_delay(
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
        delay: Option<Duration>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                bot_token: bot_token.into(),
                chat_id: chat_id.into(),
                delay,
                messages: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Messages accepted so far.
    pub fn messages(&self) -> Vec<TelegramMessage> {
        self.inner
            .messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    pub fn router(&self) -> Router<()> {
        Router::new()
            .route(SEND_MESSAGE_ROUTE, routing::post(send_message))
            .with_state(self.clone())
    }

    /// Serve the fake api on an ephemeral port of the loopback interface in the
    /// background and return its base url.
    pub async fn spawn(&self) -> anyhow::Result<Url> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .context("Failed to bind fake telegram server")?;
        let addr = listener.local_addr()?;
        let router = self.router();
        tokio::spawn(async move { axum::serve(listener, router).await });
        base_url(addr)
    }
}

fn base_url(addr: SocketAddr) -> anyhow::Result<Url> {
    format!("http://{addr}/")
        .parse()
        .context("Failed to build fake telegram url")
}

pub async fn start_server(
    host: IpAddr,
    port: u16,
    bot_token: String,
    chat_id: String,
    delay: Option<Duration>,
) -> anyhow::Result<()> {
    info!("Starting telegram testing server on {host}:{port}");
    info!("Bot API endpoint: http://{host}:{port}/");
    info!("Bot token: {bot_token:?}");
    info!("Chat id: {chat_id:?}");
    info!("Messages to any other chat are rejected with \"chat not found\"");

    let fake = FakeTelegram::with_delay(bot_token, chat_id, delay);

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, fake.router())
        .await
        .context("Failed to start HTTP server")
}

#[derive(Serialize)]
struct ErrorResponse {
    ok: bool,
    error_code: u16,
    description: &'static str,
}

fn error(status: StatusCode, description: &'static str) -> Response {
    let response = ErrorResponse {
        ok: false,
        error_code: status.as_u16(),
        description,
    };
    (status, Json(response)).into_response()
}

async fn send_message(
    State(fake): State<FakeTelegram>,
    Path(bot): Path<String>,
    Json(message): Json<TelegramMessage>,
) -> Response {
    if let Some(delay) = fake.inner.delay {
        tokio::time::sleep(delay).await;
    }

    if bot.strip_prefix("bot") != Some(fake.inner.bot_token.as_str()) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    if message.chat_id.0 != fake.inner.chat_id {
        return error(StatusCode::BAD_REQUEST, "Bad Request: chat not found");
    }

    if message.text.trim().is_empty() {
        return error(StatusCode::BAD_REQUEST, "Bad Request: message text is empty");
    }

    info!(chat_id = %message.chat_id, "Received message:\n{}", message.text);

    let Ok(mut messages) = fake.inner.messages.lock() else {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
    };
    messages.push(message.clone());
    let message_id = messages.len();

    Json(json!({
        "ok": true,
        "result": {
            "message_id": message_id,
            "chat": {"id": message.chat_id},
            "text": message.text,
        }
    }))
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn post(url: Url, bot: &str, body: serde_json::Value) -> (u16, serde_json::Value) {
        // not `Url::join`, "bot1:token" would be parsed as a url scheme
        let url = format!("{url}{bot}/sendMessage");
        let response = reqwest::Client::new()
            .post(url)
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    #[tokio::test]
    async fn accepts_and_records() {
        let fake = FakeTelegram::new("1:token", "42");
        let url = fake.spawn().await.unwrap();

        let (status, body) = post(
            url,
            "bot1:token",
            json!({"chat_id": "42", "text": "hello"}),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(body["ok"], true);
        assert_eq!(
            fake.messages(),
            [TelegramMessage {
                chat_id: "42".to_owned().into(),
                text: "hello".into()
            }]
        );
    }

    #[tokio::test]
    async fn rejects_wrong_token() {
        let fake = FakeTelegram::new("1:token", "42");
        let url = fake.spawn().await.unwrap();

        let (status, body) = post(
            url,
            "bot1:other",
            json!({"chat_id": "42", "text": "hello"}),
        )
        .await;

        assert_eq!(status, 401);
        assert_eq!(body["ok"], false);
        assert!(fake.messages().is_empty());
    }

    #[tokio::test]
    async fn rejects_unknown_chat() {
        let fake = FakeTelegram::new("1:token", "42");
        let url = fake.spawn().await.unwrap();

        let (status, body) = post(
            url,
            "bot1:token",
            json!({"chat_id": "7", "text": "hello"}),
        )
        .await;

        assert_eq!(status, 400);
        assert_eq!(body["description"], "Bad Request: chat not found");
        assert!(fake.messages().is_empty());
    }
}
