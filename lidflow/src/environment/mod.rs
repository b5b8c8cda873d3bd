use std::time::Duration;

use lidflow_api_rest::RestServerConfig;
use lidflow_client::{ContactFormConfig, HttpContactApi, HttpContactApiConfig};
use lidflow_config::Config;
use lidflow_extern_impl::telegram::{TelegramApiServiceConfig, TelegramApiServiceImpl};
use lidflow_shared_impl::relay_config::{
    EnvLookup, RelayConfigServiceConfig, RelayConfigServiceImpl,
};
use types::{Contact, ContactForm, RelayConfig, RestServer, TelegramApi};
use url::Url;

pub mod types;

/// Wires the services together. Every call returns a new instance; instances
/// only share immutable configuration.
#[derive(Clone)]
pub struct Provider {
    config: ConfigProvider,
    env: Option<EnvLookup>,
}

impl Provider {
    /// Provider whose relay configuration reads the process environment.
    pub fn new(config: ConfigProvider) -> Self {
        Self { config, env: None }
    }

    /// Provider whose relay configuration reads `env` instead of the process
    /// environment.
    pub fn with_env(config: ConfigProvider, env: EnvLookup) -> Self {
        Self {
            config,
            env: Some(env),
        }
    }

    pub fn telegram_api(&self) -> TelegramApi {
        TelegramApiServiceImpl::new(self.config.telegram_api_service_config.clone())
    }

    pub fn relay_config(&self) -> RelayConfig {
        let config = self.config.relay_config_service_config.clone();
        match self.env {
            Some(env) => RelayConfigServiceImpl::with_env(config, env),
            None => RelayConfigServiceImpl::new(config),
        }
    }

    pub fn contact(&self) -> Contact {
        Contact::new(self.telegram_api(), self.relay_config())
    }

    pub fn rest_server(&self) -> RestServer {
        RestServer::new(self.contact(), self.config.rest_server_config.clone())
    }

    pub fn contact_form(&self) -> anyhow::Result<ContactForm> {
        let api = HttpContactApi::new(self.config.http_contact_api_config.clone())?;
        Ok(ContactForm::new(api, self.config.contact_form_config.clone()))
    }
}

/// Service configurations derived from the [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigProvider {
    // API
    rest_server_config: RestServerConfig,

    // Client
    http_contact_api_config: HttpContactApiConfig,
    contact_form_config: ContactFormConfig,

    // Extern
    telegram_api_service_config: TelegramApiServiceConfig,

    // Shared
    relay_config_service_config: RelayConfigServiceConfig,
}

impl ConfigProvider {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        // API
        let rest_server_config = RestServerConfig {
            host: config.http.host,
            port: config.http.port,
            allowed_origins: config.http.allowed_origins.iter().cloned().collect(),
        };

        // Client
        let http_contact_api_config =
            HttpContactApiConfig::new(&config.client.base_url, config.client.timeout.into())?;

        let contact_form_config = ContactFormConfig {
            direct_contact_url: config.site.direct_contact_url.clone().into(),
        };

        // Extern
        let telegram_api_service_config = TelegramApiServiceConfig::new(
            config.telegram.api_endpoint_override.clone(),
            config.telegram.timeout.into(),
        );

        // Shared
        let relay_config_service_config = RelayConfigServiceConfig {
            bot_token: config.telegram.bot_token.clone(),
            chat_id: config.telegram.chat_id.clone(),
            site_url: config.site.url.clone().into(),
        };

        Ok(Self {
            rest_server_config,
            http_contact_api_config,
            contact_form_config,
            telegram_api_service_config,
            relay_config_service_config,
        })
    }

    pub fn rest_server_config(&self) -> &RestServerConfig {
        &self.rest_server_config
    }

    /// Overrides the base url the Submission Client posts to.
    pub fn with_client_base_url(
        mut self,
        base_url: &Url,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        self.http_contact_api_config = HttpContactApiConfig::new(base_url, timeout)?;
        Ok(self)
    }
}
