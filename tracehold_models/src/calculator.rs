use std::sync::LazyLock;

use regex::Regex;

/// Inputs of the savings calculator, after coercion of the raw form values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsInput {
    pub teus_per_month: f64,
    pub bls_per_teu: f64,
    pub avg_cost_per_bl: f64,
}

impl SavingsInput {
    pub const DEFAULT_BLS_PER_TEU: f64 = 1.5;
    pub const DEFAULT_AVG_COST_PER_BL: f64 = 70.0;

    /// Coerce raw form values.
    ///
    /// Each value is read up to the end of its leading decimal number, so
    /// trailing units are ignored. An unparsable `teus_per_month` becomes `0`.
    /// An unparsable, missing or zero `bls_per_teu` / `avg_cost_per_bl` falls
    /// back to its default.
    pub fn from_raw(
        teus_per_month: Option<&str>,
        bls_per_teu: Option<&str>,
        avg_cost_per_bl: Option<&str>,
    ) -> Self {
        Self {
            teus_per_month: parse_number(teus_per_month).unwrap_or(0.0),
            bls_per_teu: parse_number(bls_per_teu)
                .filter(|&x| x != 0.0)
                .unwrap_or(Self::DEFAULT_BLS_PER_TEU),
            avg_cost_per_bl: parse_number(avg_cost_per_bl)
                .filter(|&x| x != 0.0)
                .unwrap_or(Self::DEFAULT_AVG_COST_PER_BL),
        }
    }
}

impl Default for SavingsInput {
    fn default() -> Self {
        Self {
            teus_per_month: 0.0,
            bls_per_teu: Self::DEFAULT_BLS_PER_TEU,
            avg_cost_per_bl: Self::DEFAULT_AVG_COST_PER_BL,
        }
    }
}

/// Leading decimal number of a form value, so `"100 TEUs"` is `100`.
static NUMBER_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?").unwrap());

fn parse_number(value: Option<&str>) -> Option<f64> {
    let value = value?.trim_start();
    NUMBER_PREFIX_REGEX
        .find(value)
        .and_then(|x| x.as_str().parse::<f64>().ok())
        .filter(|x| x.is_finite())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsEstimate {
    pub total_bls: f64,
    pub min_paper_cost: f64,
    pub max_paper_cost: f64,
    pub monthly_savings: SavingsRange,
    pub annual_savings: SavingsRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavingsRange {
    pub min: i64,
    pub max: i64,
}
