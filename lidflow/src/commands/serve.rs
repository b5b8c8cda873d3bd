use lidflow_config::Config;
use lidflow_shared_contracts::relay_config::RelayConfigService;
use lidflow_shared_impl::relay_config::{BOT_TOKEN_ENV, CHAT_ID_ENV};
use tracing::{info, warn};

use crate::environment::{ConfigProvider, Provider};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let config_provider = ConfigProvider::new(&config)?;
    let provider = Provider::new(config_provider);

    if provider.relay_config().telegram_credentials().is_none() {
        warn!(
            "Telegram bot token or chat id is not configured, contact form submissions will \
             fail until {BOT_TOKEN_ENV} and {CHAT_ID_ENV} are set"
        );
    }

    let server = provider.rest_server();
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve().await
}
