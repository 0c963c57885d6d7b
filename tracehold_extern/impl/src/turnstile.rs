use std::{net::IpAddr, sync::Arc};

use serde::{Deserialize, Serialize};
use tracehold_di::Build;
use tracehold_extern_contracts::turnstile::{TurnstileApiService, TurnstileSiteverifyResponse};
use tracehold_utils::trace_instrument;
use url::Url;

use crate::http::HttpClient;

const SITEVERIFY_ENDPOINT: &str = "https://challenges.cloudflare.com/turnstile/v0/siteverify";

/// Sent as `remoteip` if the client address could not be determined.
const UNKNOWN_REMOTE_IP: &str = "unknown";

#[derive(Debug, Clone, Build)]
pub struct TurnstileApiServiceImpl {
    config: TurnstileApiServiceConfig,
    #[state]
    client: HttpClient,
}

#[derive(Debug, Clone)]
pub struct TurnstileApiServiceConfig {
    siteverify_endpoint: Arc<Url>,
}

impl TurnstileApiServiceConfig {
    pub fn new(siteverify_endpoint_override: Option<Url>) -> anyhow::Result<Self> {
        let siteverify_endpoint = match siteverify_endpoint_override {
            Some(url) => url,
            None => SITEVERIFY_ENDPOINT.parse()?,
        };

        Ok(Self {
            siteverify_endpoint: siteverify_endpoint.into(),
        })
    }
}

impl TurnstileApiService for TurnstileApiServiceImpl {
    #[trace_instrument(skip(self, response, secret))]
    async fn siteverify(
        &self,
        response: &str,
        secret: &str,
        remote_ip: Option<IpAddr>,
    ) -> anyhow::Result<TurnstileSiteverifyResponse> {
        let remoteip = remote_ip.map(|ip| ip.to_string());

        self.client
            .post((*self.config.siteverify_endpoint).clone())
            .form(&SiteverifyRequest {
                secret,
                response,
                remoteip: remoteip.as_deref().unwrap_or(UNKNOWN_REMOTE_IP),
            })
            .send()
            .await?
            .error_for_status()?
            .json::<SiteverifyResponse>()
            .await
            .map(Into::into)
            .map_err(Into::into)
    }
}

#[derive(Serialize)]
struct SiteverifyRequest<'a> {
    secret: &'a str,
    response: &'a str,
    remoteip: &'a str,
}

#[derive(Deserialize)]
struct SiteverifyResponse {
    success: bool,
    #[serde(rename = "error-codes", default)]
    error_codes: Vec<String>,
    hostname: Option<String>,
}

impl From<SiteverifyResponse> for TurnstileSiteverifyResponse {
    fn from(value: SiteverifyResponse) -> Self {
        Self {
            success: value.success,
            error_codes: value.error_codes,
            hostname: value.hostname,
        }
    }
}
