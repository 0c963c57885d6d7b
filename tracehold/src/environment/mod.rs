use std::sync::Arc;

use anyhow::ensure;
use tracehold_api_rest::{RealIpConfig, RestServerConfig};
use tracehold_config::Config;
use tracehold_core_contact_impl::ContactFeatureConfig;
use tracehold_core_health_impl::HealthFeatureConfig;
use tracehold_di::provider;
use tracehold_extern_impl::turnstile::TurnstileApiServiceConfig;
use tracehold_shared_impl::{captcha::CaptchaServiceConfig, rate_limit::RateLimitServiceConfig};
use types::Email;

pub mod types;

provider! {
    /// The default provider, capable of providing all the dependencies
    pub Provider {
        email: Email,
        ..config: ConfigProvider {
            // API
            RestServerConfig,

            // Extern
            TurnstileApiServiceConfig,

            // Shared
            CaptchaServiceConfig,
            RateLimitServiceConfig,

            // Core
            ContactFeatureConfig,
            HealthFeatureConfig,
        }
    }
}

impl Provider {
    pub fn new(config: ConfigProvider, email: Email) -> Self {
        Self {
            _cache: Default::default(),
            email,
            config,
        }
    }
}

provider! {
    /// Reduced provider, capable of providing services that only depend on the configuration
    pub ConfigProvider {
        // API
        rest_server_config: RestServerConfig,

        // Extern
        turnstile_api_service_config: TurnstileApiServiceConfig,

        // Shared
        captcha_service_config: CaptchaServiceConfig,
        rate_limit_service_config: RateLimitServiceConfig,

        // Core
        contact_feature_config: ContactFeatureConfig,
        health_feature_config: HealthFeatureConfig,
    }
}

impl ConfigProvider {
    /// Translate the loaded config into service configs, rejecting values
    /// that would only fail at request time.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        // API
        let rest_server_config = RestServerConfig {
            addr: config.http.host,
            port: config.http.port,
            real_ip_config: config.http.real_ip.as_ref().map(|real_ip_config| {
                Arc::new(RealIpConfig {
                    header: real_ip_config.header.clone(),
                    set_from: real_ip_config.set_from,
                })
            }),
        };

        // Extern
        let turnstile_api_service_config = TurnstileApiServiceConfig::new(
            config.turnstile.siteverify_endpoint_override.clone(),
        )?;

        // Shared
        ensure!(
            !config.turnstile.sitekey.is_empty(),
            "turnstile.sitekey must not be empty"
        );
        ensure!(
            !config.turnstile.secret.is_empty(),
            "turnstile.secret must not be empty"
        );
        let captcha_service_config = CaptchaServiceConfig {
            sitekey: config.turnstile.sitekey.as_str().into(),
            secret: config.turnstile.secret.as_str().into(),
        };

        let rate_limit_service_config = match &config.contact.rate_limit {
            Some(rate_limit) => {
                ensure!(
                    rate_limit.capacity > 0,
                    "contact.rate_limit.capacity must be at least 1"
                );
                ensure!(
                    !rate_limit.refill_interval.is_zero(),
                    "contact.rate_limit.refill_interval must be positive"
                );
                RateLimitServiceConfig::TokenBucket {
                    capacity: rate_limit.capacity,
                    refill_interval: *rate_limit.refill_interval,
                }
            }
            None => RateLimitServiceConfig::Disabled,
        };

        // Email
        ensure!(
            config.email.username.is_empty() || !config.email.password.is_empty(),
            "email.password must be set if email.username is set"
        );

        // Core
        let contact_feature_config = ContactFeatureConfig {
            owner_email: config.contact.owner_email.clone().into(),
            website_url: config.contact.website_url.as_str().into(),
            delivery_policy: config.contact.delivery_policy,
        };

        let health_feature_config = HealthFeatureConfig {
            cache_ttl: *config.health.cache_ttl,
        };

        Ok(Self {
            _cache: Default::default(),

            // API
            rest_server_config,

            // Extern
            turnstile_api_service_config,

            // Shared
            captcha_service_config,
            rate_limit_service_config,

            // Core
            contact_feature_config,
            health_feature_config,
        })
    }
}
