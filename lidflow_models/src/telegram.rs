use serde::{Deserialize, Serialize};

use crate::Sensitive;

/// Everything needed to deliver a message to the configured Telegram chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramCredentials {
    pub bot_token: Sensitive<String>,
    pub chat_id: TelegramChatId,
}

/// Numeric chat id or `@channelusername`, passed through to the Bot API
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TelegramChatId(pub String);

impl From<String> for TelegramChatId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TelegramChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramMessage {
    pub chat_id: TelegramChatId,
    pub text: String,
}
