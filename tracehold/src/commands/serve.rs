use anyhow::Context;
use tracehold_config::Config;
use tracehold_di::Provide;
use tracehold_email_contracts::EmailService;
use tracing::{info, warn};

use crate::{
    email,
    environment::{types::RestServer, ConfigProvider, Provider},
};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let config_provider = ConfigProvider::new(&config)?;

    info!("Connecting to smtp server");
    let email = email::connect(&config.email).context("Failed to create smtp transport")?;
    if let Err(err) = email.ping().await {
        warn!("Smtp server is not reachable, notifications will fail: {err:#}");
    }

    let mut provider = Provider::new(config_provider, email);
    let server: RestServer = provider.provide();
    server.serve().await
}
