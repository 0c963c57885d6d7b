use std::{net::IpAddr, sync::Arc};

use tracehold_di::Build;
use tracehold_extern_contracts::turnstile::TurnstileApiService;
use tracehold_shared_contracts::captcha::{CaptchaCheckError, CaptchaService};
use tracehold_utils::trace_instrument;
use tracing::debug;

#[derive(Debug, Clone, Build)]
pub struct CaptchaServiceImpl<TurnstileApi> {
    turnstile_api: TurnstileApi,
    config: CaptchaServiceConfig,
}

#[derive(Debug, Clone)]
pub struct CaptchaServiceConfig {
    pub sitekey: Arc<str>,
    pub secret: Arc<str>,
}

impl<TurnstileApi> CaptchaService for CaptchaServiceImpl<TurnstileApi>
where
    TurnstileApi: TurnstileApiService,
{
    fn get_sitekey(&self) -> Arc<str> {
        Arc::clone(&self.config.sitekey)
    }

    #[trace_instrument(skip(self, token))]
    async fn check(&self, token: &str, remote_ip: Option<IpAddr>) -> Result<(), CaptchaCheckError> {
        if token.is_empty() {
            return Err(CaptchaCheckError::Failed);
        }

        let response = self
            .turnstile_api
            .siteverify(token, &self.config.secret, remote_ip)
            .await?;

        if !response.success {
            debug!(error_codes = ?response.error_codes, "turnstile rejected the token");
            return Err(CaptchaCheckError::Failed);
        }

        Ok(())
    }
}
