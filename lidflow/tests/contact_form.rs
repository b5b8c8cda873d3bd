use std::{net::Ipv4Addr, path::Path, time::Duration};

use lidflow::environment::{types::ContactForm, ConfigProvider, Provider};
use lidflow_client::{ContactFormValues, SubmissionError, SubmissionState};
use lidflow_config::DEFAULT_CONFIG_PATH;
use lidflow_models::telegram::TelegramMessage;
use lidflow_testing::telegram::FakeTelegram;
use lidflow_utils::assert_matches;
use pretty_assertions::assert_eq;
use tokio::net::TcpListener;
use url::Url;

const BOT_TOKEN: &str = "123456:test-token";
const CHAT_ID: &str = "1000";

struct Setup {
    fake: FakeTelegram,
    base_url: Url,
    form: ContactForm,
}

/// Starts the fake Telegram api and the REST server and returns a contact
/// form which posts to that server. `telegram` is appended to the `[telegram]`
/// config section.
async fn setup(fake: FakeTelegram, telegram: &str) -> Setup {
    let telegram_url = fake.spawn().await.unwrap();

    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let base_url: Url = format!("http://{}/", listener.local_addr().unwrap())
        .parse()
        .unwrap();

    let overrides = format!(
        "[telegram]\napi_endpoint_override = \"{telegram_url}\"\n{telegram}\n\n\
         [client]\nbase_url = \"{base_url}\"\ntimeout = \"5s\"\n"
    );
    let config = lidflow_config::load_with_overrides(
        &[Path::new(DEFAULT_CONFIG_PATH)],
        &[overrides.as_str()],
    )
    .unwrap();

    let provider = Provider::with_env(ConfigProvider::new(&config).unwrap(), |_| None);
    tokio::spawn(provider.rest_server().serve_with_listener(listener));

    Setup {
        fake,
        base_url,
        form: provider.contact_form().unwrap(),
    }
}

fn configured() -> String {
    format!("bot_token = \"{BOT_TOKEN}\"\nchat_id = \"{CHAT_ID}\"")
}

fn values(name: &str, contact: &str, message: &str) -> ContactFormValues {
    ContactFormValues {
        name: name.into(),
        contact: contact.into(),
        message: message.into(),
    }
}

#[tokio::test]
async fn ok() {
    // Arrange
    let Setup { fake, mut form, .. } =
        setup(FakeTelegram::new(BOT_TOKEN, CHAT_ID), &configured()).await;
    *form.values_mut() = values("Anna", "anna@example.com", "Need a 5-page site");

    // Act
    let result = form.submit().await;

    // Assert
    assert_eq!(result, SubmissionState::Success);
    assert_eq!(*form.values(), ContactFormValues::default());

    let messages = fake.messages();
    assert_eq!(messages.len(), 1);
    let TelegramMessage { chat_id, text } = &messages[0];
    assert_eq!(chat_id.0, CHAT_ID);
    for expected in ["Anna", "anna@example.com", "Need a 5-page site"] {
        assert!(text.contains(expected), "{text:?} does not contain {expected:?}");
    }
}

#[tokio::test]
async fn ok_without_message() {
    // Arrange
    let Setup { fake, mut form, .. } =
        setup(FakeTelegram::new(BOT_TOKEN, CHAT_ID), &configured()).await;
    *form.values_mut() = values("Bob", "bob@x.com", "");

    // Act
    let result = form.submit().await;

    // Assert
    assert_eq!(result, SubmissionState::Success);
    let messages = fake.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].text.contains("Message: -\n"));
    assert!(!messages[0].text.contains("undefined"));
}

#[tokio::test]
async fn invalid_values_are_not_sent() {
    // Arrange
    let Setup { fake, mut form, .. } =
        setup(FakeTelegram::new(BOT_TOKEN, CHAT_ID), &configured()).await;
    *form.values_mut() = values("A", "ab", "");

    // Act
    let result = form.submit().await;

    // Assert
    assert_matches!(
        result,
        SubmissionState::Error(SubmissionError::Validation(_))
    );
    assert_eq!(*form.values(), values("A", "ab", ""));
    assert!(fake.messages().is_empty());
}

#[tokio::test]
async fn relay_rejected() {
    // Arrange
    let Setup { fake, mut form, .. } =
        setup(FakeTelegram::new(BOT_TOKEN, "2000"), &configured()).await;
    *form.values_mut() = values("Anna", "anna@example.com", "Need a 5-page site");

    // Act
    let result = form.submit().await;

    // Assert
    let SubmissionState::Error(err) = result else {
        panic!("expected an error, got {result:?}");
    };
    assert_eq!(err, SubmissionError::Rejected);
    assert!(!err.to_string().is_empty());
    assert_eq!(
        *form.values(),
        values("Anna", "anna@example.com", "Need a 5-page site")
    );
    assert!(fake.messages().is_empty());
}

#[tokio::test]
async fn relay_timeout() {
    // Arrange
    let fake = FakeTelegram::with_delay(BOT_TOKEN, CHAT_ID, Some(Duration::from_secs(3)));
    let telegram = format!("{}\ntimeout = \"200ms\"", configured());
    let Setup { mut form, .. } = setup(fake, &telegram).await;
    *form.values_mut() = values("Anna", "anna@example.com", "");

    // Act
    let result = form.submit().await;

    // Assert
    assert_eq!(result, SubmissionState::Error(SubmissionError::Rejected));
    assert_eq!(*form.values(), values("Anna", "anna@example.com", ""));
}

#[tokio::test]
async fn not_configured() {
    // Arrange
    let Setup { fake, mut form, .. } = setup(FakeTelegram::new(BOT_TOKEN, CHAT_ID), "").await;
    *form.values_mut() = values("Anna", "anna@example.com", "");

    // Act
    let result = form.submit().await;

    // Assert
    assert_eq!(result, SubmissionState::Error(SubmissionError::Rejected));
    assert!(fake.messages().is_empty());
}

#[tokio::test]
async fn upstream_error_is_not_exposed() {
    // Arrange
    let Setup { base_url, .. } = setup(FakeTelegram::new(BOT_TOKEN, "2000"), &configured()).await;

    // Act
    let response = reqwest::Client::new()
        .post(base_url.join("api/telegram").unwrap())
        .json(&serde_json::json!({"name": "Anna", "contact": "anna@example.com"}))
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), reqwest::StatusCode::BAD_GATEWAY);
    let body = response.text().await.unwrap();
    assert!(!body.contains("chat not found"), "{body}");
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&body).unwrap(),
        serde_json::json!({"error": "Failed to deliver message"})
    );
}

#[tokio::test]
async fn server_unreachable() {
    // Arrange
    let config = lidflow_config::load_with_overrides(
        &[Path::new(DEFAULT_CONFIG_PATH)],
        &["[client]\nbase_url = \"http://127.0.0.1:9/\"\ntimeout = \"2s\""],
    )
    .unwrap();
    let provider = Provider::with_env(ConfigProvider::new(&config).unwrap(), |_| None);
    let mut form = provider.contact_form().unwrap();
    *form.values_mut() = values("Anna", "anna@example.com", "");

    // Act
    let result = form.submit().await;

    // Assert
    let SubmissionState::Error(err) = result else {
        panic!("expected an error, got {result:?}");
    };
    assert_matches!(&err, SubmissionError::Network { .. });
    assert!(err.to_string().contains("https://t.me/peexthree"));
}
