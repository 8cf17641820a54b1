//! Adapter between the canonical series and the forecasting model

use chrono::NaiveDateTime;
use data_spi::{ForecastHorizon, ForecastRow, Series};
use forecast_core::{future_only, AdditiveModel, Forecaster};
use forecast_spi::{ForecastError, Frequency};
use pipeline_spi::{ForecastOutput, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// A model fitted to one series, with forecasts cached per horizon
#[derive(Debug, Clone)]
pub struct FittedModel {
    model: AdditiveModel,
    last_observed: NaiveDateTime,
    forecasts: HashMap<ForecastHorizon, Arc<ForecastOutput>>,
}

/// Fit the additive model with library defaults
pub fn fit_series(series: &Series) -> Result<FittedModel> {
    let last_observed = series
        .last_timestamp()
        .ok_or(ForecastError::InsufficientData {
            required: 2,
            actual: 0,
        })?;

    let mut model = AdditiveModel::new();
    model.fit(&series.timestamps(), &series.values())?;

    tracing::info!(
        rows = series.len(),
        frequency = %model.frequency().map(|f| f.to_string()).unwrap_or_default(),
        changepoints = model.changepoint_count(),
        "model fitted"
    );

    Ok(FittedModel {
        model,
        last_observed,
        forecasts: HashMap::new(),
    })
}

impl FittedModel {
    pub fn last_observed(&self) -> NaiveDateTime {
        self.last_observed
    }

    pub fn frequency(&self) -> Option<Frequency> {
        self.model.frequency()
    }

    pub fn model(&self) -> &AdditiveModel {
        &self.model
    }

    /// Horizons with a cached forecast
    pub fn cached_horizons(&self) -> usize {
        self.forecasts.len()
    }

    /// Forecast `horizon` periods past the history.
    ///
    /// The returned rows are exactly the predictions strictly after the last
    /// observed timestamp.
    pub fn forecast(&mut self, horizon: ForecastHorizon) -> Result<Arc<ForecastOutput>> {
        if let Some(output) = self.forecasts.get(&horizon) {
            tracing::debug!(%horizon, "forecast cache hit");
            return Ok(Arc::clone(output));
        }

        let timeline = self.model.extend(horizon.periods())?;
        let prediction = self.model.predict(&timeline)?;
        let future = future_only(&prediction, self.last_observed);
        let rows: Vec<ForecastRow> = (0..future.len())
            .map(|i| {
                ForecastRow::new(
                    future.timestamps[i],
                    future.yhat[i],
                    future.lower[i],
                    future.upper[i],
                )
            })
            .collect();
        let profiles = self.model.seasonal_profiles()?;
        let frequency = self.model.frequency().ok_or(ForecastError::NotFitted)?;

        tracing::info!(%horizon, rows = rows.len(), "forecast computed");

        let output = Arc::new(ForecastOutput {
            horizon,
            last_observed: self.last_observed,
            frequency,
            rows,
            prediction,
            profiles,
        });
        self.forecasts.insert(horizon, Arc::clone(&output));
        Ok(output)
    }
}
