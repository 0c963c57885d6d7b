use std::{net::IpAddr, sync::Arc};

use anyhow::Context;
use axum::{extract::State, routing, Form, Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;

pub const SITEVERIFY_ROUTE: &str = "/turnstile/v0/siteverify";

pub async fn start_server(host: IpAddr, port: u16, secret: String) -> anyhow::Result<()> {
    info!("Starting turnstile testing server on {host}:{port}");
    info!("Turnstile siteverify endpoint: http://{host}:{port}{SITEVERIFY_ROUTE}");
    info!("Secret: {secret:?}");
    info!("Valid turnstile responses are \"success\" and \"success-HOSTNAME\"");

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router(secret))
        .await
        .context("Failed to start HTTP server")
}

/// Router emulating the Cloudflare Turnstile siteverify endpoint.
pub fn router(secret: String) -> Router<()> {
    Router::new()
        .route(SITEVERIFY_ROUTE, routing::post(siteverify))
        .with_state(secret.into())
}

#[derive(Deserialize)]
struct SiteverifyRequest {
    secret: String,
    response: String,
    #[serde(default)]
    remoteip: Option<String>,
}

#[derive(Serialize)]
struct SiteverifyResponse {
    success: bool,
    #[serde(rename = "error-codes")]
    error_codes: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hostname: Option<String>,
}

async fn siteverify(
    state: State<Arc<str>>,
    Form(SiteverifyRequest {
        secret,
        response,
        remoteip,
    }): Form<SiteverifyRequest>,
) -> Json<SiteverifyResponse> {
    info!(?remoteip, "siteverify");

    if *secret != **state {
        return Json(SiteverifyResponse {
            success: false,
            error_codes: vec!["invalid-input-secret"],
            hostname: None,
        });
    }

    let (head, hostname) = match response.split_once('-') {
        Some((head, hostname)) => (head, hostname),
        None => (response.as_str(), "localhost"),
    };

    if head != "success" {
        return Json(SiteverifyResponse {
            success: false,
            error_codes: vec!["invalid-input-response"],
            hostname: None,
        });
    }

    Json(SiteverifyResponse {
        success: true,
        error_codes: Vec::new(),
        hostname: Some(hostname.into()),
    })
}
