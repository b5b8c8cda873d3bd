use anyhow::Context;
use clap::Subcommand;
use lidflow_config::Config;
use lidflow_extern_contracts::telegram::TelegramApiService;
use lidflow_models::telegram::TelegramMessage;
use lidflow_shared_contracts::relay_config::RelayConfigService;
use lidflow_shared_impl::relay_config::{BOT_TOKEN_ENV, CHAT_ID_ENV};
use tracing::info;

use crate::environment::{ConfigProvider, Provider};

#[derive(Debug, Subcommand)]
pub enum TelegramCommand {
    /// Send a test message to the configured chat
    Test {
        /// Text of the test message
        #[arg(long, default_value = "Telegram relay seems to be working!")]
        text: String,
    },
}

impl TelegramCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            TelegramCommand::Test { text } => test(config, text).await,
        }
    }
}

async fn test(config: Config, text: String) -> anyhow::Result<()> {
    let provider = Provider::new(ConfigProvider::new(&config)?);

    let credentials = provider
        .relay_config()
        .telegram_credentials()
        .with_context(|| {
            format!("Telegram bot token or chat id is not configured (set {BOT_TOKEN_ENV} and {CHAT_ID_ENV})")
        })?;

    let message = TelegramMessage {
        chat_id: credentials.chat_id,
        text,
    };

    provider
        .telegram_api()
        .send_message(&credentials.bot_token, &message)
        .await
        .context("Failed to send test message")?;

    info!(chat_id = %message.chat_id, "Test message sent");

    Ok(())
}
