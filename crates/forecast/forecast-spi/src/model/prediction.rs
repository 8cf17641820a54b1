//! Forecaster output

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A named additive component evaluated on the prediction timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub values: Vec<f64>,
}

/// Predictions over a timeline. All vectors share the timeline's length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub timestamps: Vec<NaiveDateTime>,
    /// Point estimate
    pub yhat: Vec<f64>,
    /// Lower uncertainty bound
    pub lower: Vec<f64>,
    /// Upper uncertainty bound
    pub upper: Vec<f64>,
    /// Trend component
    pub trend: Vec<f64>,
    /// Seasonal components, in model order
    pub components: Vec<Component>,
}

impl Prediction {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Only the entries strictly after `cutoff`.
    pub fn after(&self, cutoff: NaiveDateTime) -> Prediction {
        let keep: Vec<usize> = self
            .timestamps
            .iter()
            .enumerate()
            .filter(|(_, ts)| **ts > cutoff)
            .map(|(i, _)| i)
            .collect();
        let pick = |v: &[f64]| keep.iter().map(|&i| v[i]).collect::<Vec<f64>>();

        Prediction {
            timestamps: keep.iter().map(|&i| self.timestamps[i]).collect(),
            yhat: pick(&self.yhat),
            lower: pick(&self.lower),
            upper: pick(&self.upper),
            trend: pick(&self.trend),
            components: self
                .components
                .iter()
                .map(|c| Component {
                    name: c.name.clone(),
                    values: pick(&c.values),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn sample() -> Prediction {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Prediction {
            timestamps: (0..4).map(|i| start + Duration::days(i)).collect(),
            yhat: vec![1.0, 2.0, 3.0, 4.0],
            lower: vec![0.5, 1.5, 2.5, 3.5],
            upper: vec![1.5, 2.5, 3.5, 4.5],
            trend: vec![1.0, 2.0, 3.0, 4.0],
            components: vec![Component {
                name: "weekly".to_string(),
                values: vec![0.0, 0.1, 0.2, 0.3],
            }],
        }
    }

    #[test]
    fn test_after_is_strict() {
        let p = sample();
        let cutoff = p.timestamps[1];
        let future = p.after(cutoff);
        assert_eq!(future.len(), 2);
        assert_eq!(future.yhat, vec![3.0, 4.0]);
        assert_eq!(future.component("weekly").unwrap().values, vec![0.2, 0.3]);
        assert!(future.timestamps.iter().all(|t| *t > cutoff));
    }

    #[test]
    fn test_after_last_is_empty() {
        let p = sample();
        let last = *p.timestamps.last().unwrap();
        assert!(p.after(last).is_empty());
    }
}
