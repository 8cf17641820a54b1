//! Trait for confidence interval computation

use crate::model::ConfidenceInterval;

/// Turns point forecasts and their standard errors into an interval
pub trait ConfidenceIntervalComputer: Send + Sync {
    /// Compute bounds at `confidence_level` (e.g. 0.80)
    fn compute(
        &self,
        forecast: &[f64],
        std_errors: &[f64],
        confidence_level: f64,
    ) -> ConfidenceInterval;
}
