use std::sync::Arc;

use lidflow_models::{telegram::TelegramCredentials, Sensitive};
use lidflow_shared_contracts::relay_config::RelayConfigService;
use tracing::warn;
use url::Url;

pub const BOT_TOKEN_ENV: &str = "TG_BOT_TOKEN";
pub const CHAT_ID_ENV: &str = "TG_CHAT_ID";
pub const SITE_URL_ENV: &str = "NEXT_PUBLIC_SITE_URL";

pub type EnvLookup = fn(&str) -> Option<String>;

/// Reads the relay configuration from the process environment on every call,
/// falling back to the values of the config file. Empty values count as unset.
#[derive(Clone)]
pub struct RelayConfigServiceImpl {
    config: RelayConfigServiceConfig,
    env: EnvLookup,
}

#[derive(Debug, Clone)]
pub struct RelayConfigServiceConfig {
    pub bot_token: Option<Sensitive<String>>,
    pub chat_id: Option<String>,
    pub site_url: Arc<Url>,
}

impl RelayConfigServiceImpl {
    pub fn new(config: RelayConfigServiceConfig) -> Self {
        Self::with_env(config, |key| std::env::var(key).ok())
    }

    pub fn with_env(config: RelayConfigServiceConfig, env: EnvLookup) -> Self {
        Self { config, env }
    }

    fn lookup(&self, key: &str) -> Option<String> {
        (self.env)(key).filter(|value| !value.trim().is_empty())
    }
}

impl std::fmt::Debug for RelayConfigServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfigServiceImpl")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RelayConfigService for RelayConfigServiceImpl {
    fn telegram_credentials(&self) -> Option<TelegramCredentials> {
        let bot_token = self.lookup(BOT_TOKEN_ENV).map(Sensitive).or_else(|| {
            self.config
                .bot_token
                .clone()
                .filter(|token| !token.trim().is_empty())
        })?;

        let chat_id = self.lookup(CHAT_ID_ENV).or_else(|| {
            self.config
                .chat_id
                .clone()
                .filter(|chat_id| !chat_id.trim().is_empty())
        })?;

        Some(TelegramCredentials {
            bot_token,
            chat_id: chat_id.into(),
        })
    }

    fn site_url(&self) -> Url {
        let Some(value) = self.lookup(SITE_URL_ENV) else {
            return (*self.config.site_url).clone();
        };

        value.parse().unwrap_or_else(|err| {
            warn!(%value, "Ignoring invalid {SITE_URL_ENV}: {err}");
            (*self.config.site_url).clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn config(bot_token: Option<&str>, chat_id: Option<&str>) -> RelayConfigServiceConfig {
        RelayConfigServiceConfig {
            bot_token: bot_token.map(|x| Sensitive(x.into())),
            chat_id: chat_id.map(Into::into),
            site_url: Arc::new("https://lidflow.vercel.app".parse().unwrap()),
        }
    }

    fn empty_env(_: &str) -> Option<String> {
        None
    }

    fn full_env(key: &str) -> Option<String> {
        match key {
            BOT_TOKEN_ENV => Some("env-token".into()),
            CHAT_ID_ENV => Some("-100200".into()),
            SITE_URL_ENV => Some("https://example.com/".into()),
            _ => None,
        }
    }

    fn blank_env(_: &str) -> Option<String> {
        Some("  ".into())
    }

    fn invalid_site_url_env(key: &str) -> Option<String> {
        (key == SITE_URL_ENV).then(|| "not a url".into())
    }

    #[test]
    fn from_config() {
        // Arrange
        let sut = RelayConfigServiceImpl::with_env(config(Some("token"), Some("42")), empty_env);

        // Act
        let result = sut.telegram_credentials();

        // Assert
        assert_eq!(
            result,
            Some(TelegramCredentials {
                bot_token: Sensitive("token".into()),
                chat_id: "42".to_owned().into(),
            })
        );
        assert_eq!(sut.site_url().as_str(), "https://lidflow.vercel.app/");
    }

    #[test]
    fn env_takes_precedence() {
        // Arrange
        let sut = RelayConfigServiceImpl::with_env(config(Some("token"), Some("42")), full_env);

        // Act
        let result = sut.telegram_credentials();

        // Assert
        assert_eq!(
            result,
            Some(TelegramCredentials {
                bot_token: Sensitive("env-token".into()),
                chat_id: "-100200".to_owned().into(),
            })
        );
        assert_eq!(sut.site_url().as_str(), "https://example.com/");
    }

    #[test]
    fn missing_bot_token() {
        let sut = RelayConfigServiceImpl::with_env(config(None, Some("42")), empty_env);
        assert_eq!(sut.telegram_credentials(), None);
    }

    #[test]
    fn missing_chat_id() {
        let sut = RelayConfigServiceImpl::with_env(config(Some("token"), None), empty_env);
        assert_eq!(sut.telegram_credentials(), None);
    }

    #[test]
    fn blank_values_are_unset() {
        let sut = RelayConfigServiceImpl::with_env(config(Some(""), Some(" ")), blank_env);
        assert_eq!(sut.telegram_credentials(), None);
        assert_eq!(sut.site_url().as_str(), "https://lidflow.vercel.app/");
    }

    #[test]
    fn invalid_site_url_falls_back() {
        let sut = RelayConfigServiceImpl::with_env(config(None, None), invalid_site_url_env);
        assert_eq!(sut.site_url().as_str(), "https://lidflow.vercel.app/");
    }
}
