use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tracehold_core_calculator_contracts::CalculatorFeatureService;
use tracehold_core_config_contracts::ConfigFeatureService;
use tracehold_core_contact_contracts::ContactFeatureService;
use tracehold_core_health_contracts::HealthFeatureService;
use tracehold_di::Build;
use tracing::info;

mod errors;
mod middlewares;
mod models;
mod routes;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Build)]
pub struct RestServer<Health, Config, Contact, Calculator> {
    config: RestServerConfig,
    health_feature_service: Health,
    config_feature_service: Config,
    contact_feature_service: Contact,
    calculator_feature_service: Calculator,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub addr: IpAddr,
    pub port: u16,
    pub real_ip_config: Option<Arc<RealIpConfig>>,
}

/// Trust `header` to contain the client address if the request comes from
/// `set_from`.
#[derive(Debug, Clone)]
pub struct RealIpConfig {
    pub header: String,
    pub set_from: IpAddr,
}

impl<Health, Config, Contact, Calculator> RestServer<Health, Config, Contact, Calculator>
where
    Health: HealthFeatureService,
    Config: ConfigFeatureService,
    Contact: ContactFeatureService,
    Calculator: CalculatorFeatureService,
{
    pub async fn serve(self) -> anyhow::Result<()> {
        let RestServerConfig { addr, port, .. } = self.config;

        let listener = TcpListener::bind((addr, port))
            .await
            .with_context(|| format!("Failed to bind to {addr}:{port}"))?;
        info!("Starting REST API server on {addr}:{port}");

        axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Failed to start HTTP server")
    }

    fn router(self) -> Router<()> {
        let router = Router::new()
            .merge(routes::health::router(self.health_feature_service.into()))
            .merge(routes::config::router(self.config_feature_service.into()))
            .merge(routes::contact::router(self.contact_feature_service.into()))
            .merge(routes::calculator::router(
                self.calculator_feature_service.into(),
            ));

        // the last layer added runs first
        let router = middlewares::panic_handler::add(router);
        let router = middlewares::trace::add(router);
        let router = middlewares::client_ip::add(self.config.real_ip_config)(router);
        middlewares::request_id::add(router)
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down REST API server");
}
