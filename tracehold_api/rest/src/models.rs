use serde::{Deserialize, Serialize};
use tracehold_models::calculator::{SavingsEstimate, SavingsInput, SavingsRange};

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub message: &'static str,
}

/// Raw calculator form values. Malformed numbers fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ApiSavingsQuery {
    #[serde(rename = "teusPerMonth")]
    pub teus_per_month: Option<String>,
    #[serde(rename = "blsPerTeu")]
    pub bls_per_teu: Option<String>,
    #[serde(rename = "avgCostPerBL")]
    pub avg_cost_per_bl: Option<String>,
}

impl From<ApiSavingsQuery> for SavingsInput {
    fn from(value: ApiSavingsQuery) -> Self {
        SavingsInput::from_raw(
            value.teus_per_month.as_deref(),
            value.bls_per_teu.as_deref(),
            value.avg_cost_per_bl.as_deref(),
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSavingsEstimate {
    #[serde(rename = "totalBLs")]
    pub total_bls: f64,
    pub min_paper_cost: f64,
    pub max_paper_cost: f64,
    pub monthly_savings: ApiSavingsRange,
    pub annual_savings: ApiSavingsRange,
}

#[derive(Debug, Serialize)]
pub struct ApiSavingsRange {
    pub min: i64,
    pub max: i64,
}

impl From<SavingsEstimate> for ApiSavingsEstimate {
    fn from(value: SavingsEstimate) -> Self {
        Self {
            total_bls: value.total_bls,
            min_paper_cost: value.min_paper_cost,
            max_paper_cost: value.max_paper_cost,
            monthly_savings: value.monthly_savings.into(),
            annual_savings: value.annual_savings.into(),
        }
    }
}

impl From<SavingsRange> for ApiSavingsRange {
    fn from(SavingsRange { min, max }: SavingsRange) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiCaptchaConfig {
    pub sitekey: String,
}
