use tracehold_core_calculator_contracts::CalculatorFeatureService;
use tracehold_di::Build;
use tracehold_models::calculator::{SavingsEstimate, SavingsInput, SavingsRange};
use tracehold_utils::trace_instrument;

/// Cost of issuing one digital bill of lading.
pub const DIGITAL_COST_PER_BL: f64 = 12.0;

/// Bounds of the paper cost band around the average cost per bill of lading.
pub const MIN_PAPER_COST: f64 = 60.0;
pub const MAX_PAPER_COST: f64 = 80.0;
pub const PAPER_COST_SPREAD: f64 = 10.0;

const MONTHS_PER_YEAR: i64 = 12;

#[derive(Debug, Clone, Copy, Default, Build)]
pub struct CalculatorFeatureServiceImpl;

impl CalculatorFeatureService for CalculatorFeatureServiceImpl {
    #[trace_instrument(skip(self))]
    fn compute_savings(&self, input: SavingsInput) -> Option<SavingsEstimate> {
        compute_savings(input)
    }
}

pub fn compute_savings(input: SavingsInput) -> Option<SavingsEstimate> {
    if input.teus_per_month.is_nan() || input.teus_per_month <= 0.0 {
        return None;
    }

    let total_bls = input.teus_per_month * input.bls_per_teu;
    let min_paper_cost = MIN_PAPER_COST.max(input.avg_cost_per_bl - PAPER_COST_SPREAD);
    let max_paper_cost = MAX_PAPER_COST.min(input.avg_cost_per_bl + PAPER_COST_SPREAD);

    let min_monthly = total_bls * (min_paper_cost - DIGITAL_COST_PER_BL);
    let max_monthly = total_bls * (max_paper_cost - DIGITAL_COST_PER_BL);

    // absurdly large inputs have no meaningful estimate
    if !total_bls.is_finite() || !fits_i64(min_monthly) || !fits_i64(max_monthly) {
        return None;
    }

    let monthly_savings = SavingsRange {
        min: round_half_up(min_monthly),
        max: round_half_up(max_monthly),
    };

    let annual_savings = SavingsRange {
        min: monthly_savings.min.saturating_mul(MONTHS_PER_YEAR),
        max: monthly_savings.max.saturating_mul(MONTHS_PER_YEAR),
    };

    Some(SavingsEstimate {
        total_bls,
        min_paper_cost,
        max_paper_cost,
        monthly_savings,
        annual_savings,
    })
}

/// Round to the nearest integer, ties towards positive infinity.
fn round_half_up(x: f64) -> i64 {
    let floor = x.floor();
    // `x + 0.5` may round up before flooring, the difference to the floor is exact
    let rounded = if x - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

fn fits_i64(x: f64) -> bool {
    x.is_finite() && x.abs() < i64::MAX as f64
}
