//! Confidence interval model

use serde::{Deserialize, Serialize};

/// Confidence interval result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Point forecast
    pub forecast: Vec<f64>,
    /// Lower bound of confidence interval
    pub lower: Vec<f64>,
    /// Upper bound of confidence interval
    pub upper: Vec<f64>,
    /// Confidence level (e.g., 0.80 for 80%)
    pub confidence_level: f64,
}

impl ConfidenceInterval {
    pub fn len(&self) -> usize {
        self.forecast.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forecast.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_interval_creation() {
        let ci = ConfidenceInterval {
            forecast: vec![100.0, 110.0],
            lower: vec![90.0, 100.0],
            upper: vec![110.0, 120.0],
            confidence_level: 0.80,
        };

        assert_eq!(ci.len(), 2);
        assert!(!ci.is_empty());
        assert_eq!(ci.confidence_level, 0.80);
    }
}
