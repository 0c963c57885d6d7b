use std::{
    net::IpAddr,
    path::{Path, PathBuf},
};

use anyhow::Context;
use config::{Environment, File, FileFormat};
pub use duration::Duration;
use serde::Deserialize;
use tracehold_models::{contact::DeliveryPolicy, email_address::EmailAddressWithName};
use url::Url;

mod duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Overrides for local development and tests. Never loaded by [`load`].
pub const DEV_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.dev.toml");

/// Colon separated list of additional config files.
pub const CONFIG_PATHS_ENV: &str = "TRACEHOLD_CONFIG";

/// Prefix of environment variables overriding config values, e.g.
/// `TRACEHOLD__TURNSTILE__SECRET`.
pub const ENV_PREFIX: &str = "TRACEHOLD";

/// Load the default config file, the files listed in `TRACEHOLD_CONFIG` and
/// the `TRACEHOLD__*` environment variables, in this order.
pub fn load() -> anyhow::Result<Config> {
    let mut paths = vec![PathBuf::from(DEFAULT_CONFIG_PATH)];
    if let Ok(extra) = std::env::var(CONFIG_PATHS_ENV) {
        paths.extend(
            extra
                .split(':')
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        );
    }

    builder(&paths)?
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

/// Load the default config file and the development overrides.
pub fn load_dev_config() -> anyhow::Result<Config> {
    load_with_overrides(&[DEFAULT_CONFIG_PATH, DEV_CONFIG_PATH], &[])
}

/// Load the given config files and apply `overrides`, which are TOML
/// snippets like `"http.port = 8080"`.
pub fn load_with_overrides(
    paths: &[impl AsRef<Path>],
    overrides: &[&str],
) -> anyhow::Result<Config> {
    overrides
        .iter()
        .fold(builder(paths)?, |builder, &source| {
            builder.add_source(File::from_str(source, FileFormat::Toml))
        })
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

fn builder(
    paths: &[impl AsRef<Path>],
) -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    paths.iter().try_fold(config::Config::builder(), |builder, path| {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        let source = File::from_str(&content, FileFormat::Toml);
        anyhow::Ok(builder.add_source(source))
    })
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
    pub turnstile: TurnstileConfig,
    pub health: HealthConfig,
    pub sentry: Option<SentryConfig>,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    pub real_ip: Option<HttpRealIpConfig>,
}

/// Take the client address from `header` if the request comes from
/// `set_from`, i.e. a trusted reverse proxy.
#[derive(Debug, Deserialize)]
pub struct HttpRealIpConfig {
    pub header: String,
    pub set_from: IpAddr,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub security: EmailSecurity,
    pub from: EmailAddressWithName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailSecurity {
    Tls,
    Starttls,
    None,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub owner_email: EmailAddressWithName,
    pub website_url: Url,
    #[serde(default)]
    pub delivery_policy: DeliveryPolicy,
    pub rate_limit: Option<ContactRateLimitConfig>,
}

#[derive(Debug, Deserialize)]
pub struct ContactRateLimitConfig {
    pub capacity: u32,
    pub refill_interval: Duration,
}

#[derive(Debug, Deserialize)]
pub struct TurnstileConfig {
    pub sitekey: String,
    pub secret: String,
    pub siteverify_endpoint_override: Option<Url>,
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Deserialize)]
pub struct SentryConfig {
    pub dsn: Url,
}
