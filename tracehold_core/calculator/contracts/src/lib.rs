use tracehold_models::calculator::{SavingsEstimate, SavingsInput};

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait CalculatorFeatureService: Send + Sync + 'static {
    /// Estimate what switching from paper to digital bills of lading saves.
    ///
    /// Returns `None` if `teus_per_month` is not positive.
    fn compute_savings(&self, input: SavingsInput) -> Option<SavingsEstimate>;
}

#[cfg(feature = "mock")]
impl MockCalculatorFeatureService {
    pub fn with_compute_savings(
        mut self,
        input: SavingsInput,
        result: Option<SavingsEstimate>,
    ) -> Self {
        self.expect_compute_savings()
            .once()
            .with(mockall::predicate::eq(input))
            .return_const(result);
        self
    }
}
