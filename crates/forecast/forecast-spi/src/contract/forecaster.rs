//! Forecasting engine trait

use crate::error::Result;
use crate::model::Prediction;
use chrono::NaiveDateTime;

/// Fit-extend-predict contract of a forecasting engine.
///
/// Implementations must be deterministic: the same history and timeline
/// always produce the same prediction.
///
/// # Example
///
/// ```rust,ignore
/// use forecast_spi::Forecaster;
///
/// fn forecast<F: Forecaster>(
///     model: &mut F,
///     timestamps: &[chrono::NaiveDateTime],
///     values: &[f64],
///     horizon: usize,
/// ) -> forecast_spi::Result<forecast_spi::Prediction> {
///     model.fit(timestamps, values)?;
///     let timeline = model.extend(horizon)?;
///     model.predict(&timeline)
/// }
/// ```
pub trait Forecaster {
    /// Fit the model to a history sorted ascending by timestamp
    ///
    /// # Arguments
    ///
    /// * `timestamps` - Observation times
    /// * `values` - Observed values, one per timestamp
    fn fit(&mut self, timestamps: &[NaiveDateTime], values: &[f64]) -> Result<()>;

    /// Observed timestamps followed by `horizon` periods at the inferred frequency
    fn extend(&self, horizon: usize) -> Result<Vec<NaiveDateTime>>;

    /// Point estimates, uncertainty bounds and components for each timestamp
    fn predict(&self, timeline: &[NaiveDateTime]) -> Result<Prediction>;

    /// Check if the model has been fitted
    fn is_fitted(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;
    use crate::model::Frequency;
    use chrono::{Duration, NaiveDate};

    /// Mock forecaster predicting the historical mean
    struct MeanForecaster {
        history: Vec<NaiveDateTime>,
        mean: Option<f64>,
    }

    impl Forecaster for MeanForecaster {
        fn fit(&mut self, timestamps: &[NaiveDateTime], values: &[f64]) -> Result<()> {
            if values.len() < 2 {
                return Err(ForecastError::InsufficientData {
                    required: 2,
                    actual: values.len(),
                });
            }
            self.history = timestamps.to_vec();
            self.mean = Some(values.iter().sum::<f64>() / values.len() as f64);
            Ok(())
        }

        fn extend(&self, horizon: usize) -> Result<Vec<NaiveDateTime>> {
            let last = *self.history.last().ok_or(ForecastError::NotFitted)?;
            let freq = Frequency::Fixed(Duration::days(1));
            let mut timeline = self.history.clone();
            for k in 1..=horizon {
                timeline.push(freq.advance(last, k as u32).ok_or_else(|| {
                    ForecastError::NumericalError("timestamp overflow".to_string())
                })?);
            }
            Ok(timeline)
        }

        fn predict(&self, timeline: &[NaiveDateTime]) -> Result<Prediction> {
            let mean = self.mean.ok_or(ForecastError::NotFitted)?;
            let n = timeline.len();
            Ok(Prediction {
                timestamps: timeline.to_vec(),
                yhat: vec![mean; n],
                lower: vec![mean; n],
                upper: vec![mean; n],
                trend: vec![mean; n],
                components: Vec::new(),
            })
        }

        fn is_fitted(&self) -> bool {
            self.mean.is_some()
        }
    }

    #[test]
    fn test_fit_extend_predict() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let ts: Vec<NaiveDateTime> = (0..3).map(|i| start + Duration::days(i)).collect();

        let mut model = MeanForecaster {
            history: Vec::new(),
            mean: None,
        };
        assert!(!model.is_fitted());
        model.fit(&ts, &[1.0, 2.0, 3.0]).unwrap();
        assert!(model.is_fitted());

        let timeline = model.extend(2).unwrap();
        assert_eq!(timeline.len(), 5);
        let prediction = model.predict(&timeline).unwrap();
        assert_eq!(prediction.yhat, vec![2.0; 5]);
    }

    #[test]
    fn test_fit_requires_two_points() {
        let mut model = MeanForecaster {
            history: Vec::new(),
            mean: None,
        };
        let ts = [NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()];
        assert!(matches!(
            model.fit(&ts, &[1.0]),
            Err(ForecastError::InsufficientData { .. })
        ));
    }
}
