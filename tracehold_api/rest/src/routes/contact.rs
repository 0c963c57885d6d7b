use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Extension, Json, Router,
};
use serde_json::Value;
use tracehold_core_contact_contracts::{ContactFeatureService, ContactSubmitError};
use tracing::{debug, warn};

use crate::{
    errors::{error, error_with_details, internal_server_error},
    middlewares::client_ip::ClientIp,
    models::ApiMessage,
};

pub const PATH: &str = "/api/contact";

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    Router::new()
        .route(PATH, routing::post(submit))
        .with_state(service)
}

async fn submit(
    service: State<Arc<impl ContactFeatureService>>,
    client_ip: Option<Extension<ClientIp>>,
    body: Bytes,
) -> Response {
    let raw = match serde_json::from_slice::<Value>(&body) {
        Ok(raw) => raw,
        Err(err) => {
            debug!("malformed contact form body: {err}");
            return error_with_details(
                StatusCode::BAD_REQUEST,
                "Invalid form data",
                format!("Malformed JSON: {err}"),
            );
        }
    };
    let client_ip = client_ip.and_then(|Extension(ClientIp(ip))| ip);

    let result = service.submit(raw, client_ip).await;
    if let Err(err) = &result {
        debug!(kind = err.kind().as_str(), "contact form submission rejected");
    }

    match result {
        Ok(()) => Json(ApiMessage {
            message: "Form submitted successfully",
        })
        .into_response(),
        Err(ContactSubmitError::InvalidInput(violations)) => error_with_details(
            StatusCode::BAD_REQUEST,
            "Invalid form data",
            violations.to_string(),
        ),
        Err(ContactSubmitError::RateLimited) => {
            error(StatusCode::TOO_MANY_REQUESTS, "Too many requests")
        }
        Err(ContactSubmitError::Captcha) => {
            error(StatusCode::BAD_REQUEST, "Captcha verification failed")
        }
        Err(ContactSubmitError::Delivery(report)) => {
            warn!(?report, "failed to deliver contact form notifications");
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send message")
        }
        Err(ContactSubmitError::Other(err)) => internal_server_error(err),
    }
}
