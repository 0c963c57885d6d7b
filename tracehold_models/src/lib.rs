use thiserror::Error;

pub mod calculator;
pub mod contact;
pub mod email_address;
mod macros;

/// The list of constraints a single value failed to satisfy.
///
/// Used as the error type of the validated string newtypes, so that a value
/// violating several constraints reports all of them at once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.join(", "))]
pub struct ConstraintViolations(pub Vec<&'static str>);

impl ConstraintViolations {
    /// Collect the messages of all failed checks.
    pub fn check<const N: usize>(checks: [(bool, &'static str); N]) -> Result<(), Self> {
        let violations = checks
            .into_iter()
            .filter(|&(ok, _)| !ok)
            .map(|(_, message)| message)
            .collect::<Vec<_>>();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(Self(violations))
        }
    }
}
