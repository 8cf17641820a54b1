//! Trait for seasonality detection

use crate::model::SeasonalitySpec;
use chrono::NaiveDateTime;

/// Decides which seasonal components a history supports
pub trait SeasonalityDetector: Send + Sync {
    /// Seasonalities to model for a history sorted ascending
    fn detect(&self, timestamps: &[NaiveDateTime]) -> Vec<SeasonalitySpec>;
}
