use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use tracehold_core_calculator_contracts::CalculatorFeatureService;

use crate::models::{ApiSavingsEstimate, ApiSavingsQuery};

pub const PATH: &str = "/api/calculator/savings";

pub fn router(service: Arc<impl CalculatorFeatureService>) -> Router<()> {
    Router::new()
        .route(PATH, routing::get(compute_savings))
        .with_state(service)
}

async fn compute_savings(
    service: State<Arc<impl CalculatorFeatureService>>,
    Query(query): Query<ApiSavingsQuery>,
) -> Response {
    let estimate = service
        .compute_savings(query.into())
        .map(ApiSavingsEstimate::from);
    Json(estimate).into_response()
}
