//! Seasonal component descriptions

use serde::{Deserialize, Serialize};

/// A Fourier-series seasonal component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalitySpec {
    pub name: String,
    /// Period length in days
    pub period_days: f64,
    /// Number of sine/cosine pairs
    pub fourier_order: usize,
}

impl SeasonalitySpec {
    pub fn new(name: &str, period_days: f64, fourier_order: usize) -> Self {
        Self {
            name: name.to_string(),
            period_days,
            fourier_order,
        }
    }

    pub fn yearly() -> Self {
        Self::new("yearly", 365.25, 10)
    }

    pub fn weekly() -> Self {
        Self::new("weekly", 7.0, 3)
    }

    pub fn daily() -> Self {
        Self::new("daily", 1.0, 4)
    }

    /// Number of design-matrix columns this component contributes
    pub fn columns(&self) -> usize {
        2 * self.fourier_order
    }
}

/// One seasonal component evaluated over a single period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalProfile {
    pub name: String,
    pub period_days: f64,
    /// (offset in days from the period start, component value)
    pub points: Vec<(f64, f64)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_specs() {
        assert_eq!(SeasonalitySpec::yearly().columns(), 20);
        assert_eq!(SeasonalitySpec::weekly().columns(), 6);
        assert_eq!(SeasonalitySpec::daily().columns(), 8);
        assert_eq!(SeasonalitySpec::weekly().period_days, 7.0);
    }
}
