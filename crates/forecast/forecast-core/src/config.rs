//! Model configuration

use forecast_spi::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Whether a seasonal component is modelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonalityToggle {
    /// Decide from the history's span and spacing
    Auto,
    Enabled,
    Disabled,
}

/// Configuration for the additive model.
///
/// The defaults are the only settings the application uses; the builder
/// exists for tests and library callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Maximum number of potential trend changepoints
    pub n_changepoints: usize,
    /// Share of the history in which changepoints are placed
    pub changepoint_range: f64,
    /// Prior scale of changepoint slope adjustments
    pub changepoint_prior_scale: f64,
    /// Prior scale of seasonal Fourier coefficients
    pub seasonality_prior_scale: f64,
    /// Width of the uncertainty interval
    pub interval_width: f64,
    pub yearly: SeasonalityToggle,
    pub weekly: SeasonalityToggle,
    pub daily: SeasonalityToggle,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            interval_width: 0.80,
            yearly: SeasonalityToggle::Auto,
            weekly: SeasonalityToggle::Auto,
            daily: SeasonalityToggle::Auto,
        }
    }
}

impl ModelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_changepoints(mut self, n: usize) -> Self {
        self.n_changepoints = n;
        self
    }

    pub fn with_changepoint_range(mut self, range: f64) -> Self {
        self.changepoint_range = range;
        self
    }

    pub fn with_changepoint_prior_scale(mut self, scale: f64) -> Self {
        self.changepoint_prior_scale = scale;
        self
    }

    pub fn with_seasonality_prior_scale(mut self, scale: f64) -> Self {
        self.seasonality_prior_scale = scale;
        self
    }

    pub fn with_interval_width(mut self, width: f64) -> Self {
        self.interval_width = width;
        self
    }

    pub fn with_yearly(mut self, toggle: SeasonalityToggle) -> Self {
        self.yearly = toggle;
        self
    }

    pub fn with_weekly(mut self, toggle: SeasonalityToggle) -> Self {
        self.weekly = toggle;
        self
    }

    pub fn with_daily(mut self, toggle: SeasonalityToggle) -> Self {
        self.daily = toggle;
        self
    }

    /// Reject settings the model cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.changepoint_range > 0.0 && self.changepoint_range <= 1.0) {
            return Err(invalid("changepoint_range", "must be in (0, 1]"));
        }
        if !(self.changepoint_prior_scale > 0.0) {
            return Err(invalid("changepoint_prior_scale", "must be positive"));
        }
        if !(self.seasonality_prior_scale > 0.0) {
            return Err(invalid("seasonality_prior_scale", "must be positive"));
        }
        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(invalid("interval_width", "must be between 0 and 1"));
        }
        Ok(())
    }
}

fn invalid(name: &str, reason: &str) -> ForecastError {
    ForecastError::InvalidParameter {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.n_changepoints, 25);
        assert_eq!(config.interval_width, 0.80);
        assert_eq!(config.weekly, SeasonalityToggle::Auto);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ModelConfig::new()
            .with_changepoints(5)
            .with_interval_width(0.95)
            .with_yearly(SeasonalityToggle::Disabled);
        assert_eq!(config.n_changepoints, 5);
        assert_eq!(config.interval_width, 0.95);
        assert_eq!(config.yearly, SeasonalityToggle::Disabled);
    }

    #[test]
    fn test_validate_rejects_bad_width() {
        let config = ModelConfig::new().with_interval_width(1.5);
        assert!(matches!(
            config.validate(),
            Err(ForecastError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_range() {
        assert!(ModelConfig::new().with_changepoint_range(0.0).validate().is_err());
        assert!(ModelConfig::new()
            .with_changepoint_prior_scale(-1.0)
            .validate()
            .is_err());
    }
}
