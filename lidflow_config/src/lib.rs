use std::{net::IpAddr, path::Path};

use anyhow::Context;
use config::{File, FileFormat};
pub use duration::Duration;
use lidflow_models::Sensitive;
use serde::Deserialize;
use url::Url;

mod duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");
pub const DEV_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.dev.toml");

/// Environment variable listing additional config files (separated by `:`)
/// which are layered on top of the default config.
pub const CONFIG_PATHS_ENV: &str = "LIDFLOW_CONFIG";

/// Load the default config and every file listed in [`CONFIG_PATHS_ENV`].
pub fn load() -> anyhow::Result<Config> {
    let extra = std::env::var(CONFIG_PATHS_ENV).unwrap_or_default();
    let paths = std::iter::once(DEFAULT_CONFIG_PATH)
        .chain(extra.split(':').filter(|path| !path.is_empty()))
        .map(Path::new)
        .collect::<Vec<_>>();
    load_with_overrides(&paths, &[])
}

/// Load the default config together with the development config.
pub fn load_dev_config() -> anyhow::Result<Config> {
    load_with_overrides(
        &[Path::new(DEFAULT_CONFIG_PATH), Path::new(DEV_CONFIG_PATH)],
        &[],
    )
}

/// Load the given config files in order, followed by inline toml snippets
/// (e.g. `telegram.chat_id = "42"`).
pub fn load_with_overrides(
    paths: &[impl AsRef<Path>],
    overrides: &[&str],
) -> anyhow::Result<Config> {
    let builder = paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?;

    overrides
        .iter()
        .fold(builder, |builder, &content| {
            builder.add_source(File::from_str(content, FileFormat::Toml))
        })
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub telegram: TelegramConfig,
    pub site: SiteConfig,
    pub client: ClientConfig,
    pub sentry: Option<SentryConfig>,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramConfig {
    pub api_endpoint_override: Option<Url>,
    pub timeout: Duration,
    pub bot_token: Option<Sensitive<String>>,
    pub chat_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    pub url: Url,
    pub direct_contact_url: Url,
}

#[derive(Debug, Deserialize)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
pub struct SentryConfig {
    pub dsn: Url,
}
