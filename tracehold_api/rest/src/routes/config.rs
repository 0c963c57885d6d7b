use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use tracehold_core_config_contracts::ConfigFeatureService;

use crate::models::ApiCaptchaConfig;

pub const PATH: &str = "/api/captcha";

pub fn router(service: Arc<impl ConfigFeatureService>) -> Router<()> {
    Router::new()
        .route(PATH, routing::get(get_captcha_config))
        .with_state(service)
}

async fn get_captcha_config(service: State<Arc<impl ConfigFeatureService>>) -> Response {
    Json(ApiCaptchaConfig {
        sitekey: service.get_captcha_sitekey().to_string(),
    })
    .into_response()
}
