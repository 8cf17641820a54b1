//! Additive trend + seasonality model
//!
//! `y(t) = trend(t) + Σ seasonal_i(t) + ε`
//!
//! The trend is piecewise linear with automatically placed changepoints and
//! seasonal components are Fourier series. Both are fitted jointly by ridge
//! regression where the penalties play the role of Gaussian priors on the
//! changepoint deltas and seasonal coefficients. Uncertainty combines the
//! observation noise with extrapolated trend drift, so bands are
//! deterministic and widen with distance from the history.

use crate::config::ModelConfig;
use crate::confidence::NormalIntervalComputer;
use crate::frequency::{future_timeline, infer_frequency};
use crate::seasonality::{days_since_epoch, fourier_series, AutoSeasonality};
use crate::solver::ridge_solve;
use crate::trend::{changepoint_features, piecewise_linear, select_changepoints, trend_variance};
use chrono::{NaiveDate, NaiveDateTime};
use forecast_spi::{
    Component, ConfidenceIntervalComputer, ForecastError, Forecaster, Frequency, Prediction,
    Result, SeasonalProfile, SeasonalityDetector, SeasonalitySpec,
};

/// Penalty on intercept and slope
const BASE_PENALTY: f64 = 1e-8;
/// Lower bound of the changepoint penalty
const MIN_DELTA_PENALTY: f64 = 1e-6;
/// Points per seasonal profile
const PROFILE_POINTS: usize = 200;

/// Parameters learned by `fit`, in scaled units
#[derive(Debug, Clone)]
struct FittedState {
    t0: f64,
    span_days: f64,
    y_scale: f64,
    history: Vec<NaiveDateTime>,
    frequency: Frequency,
    changepoints: Vec<f64>,
    offset: f64,
    slope: f64,
    deltas: Vec<f64>,
    seasonalities: Vec<SeasonalitySpec>,
    seasonal_coefs: Vec<Vec<f64>>,
    sigma: f64,
}

impl FittedState {
    fn scaled_time(&self, days: f64) -> f64 {
        (days - self.t0) / self.span_days
    }

    fn seasonal_component(&self, index: usize, days: &[f64]) -> Vec<f64> {
        let spec = &self.seasonalities[index];
        let coefs = &self.seasonal_coefs[index];
        fourier_series(days, spec.period_days, spec.fourier_order)
            .iter()
            .map(|row| row.iter().zip(coefs).map(|(x, b)| x * b).sum::<f64>() * self.y_scale)
            .collect()
    }
}

/// Additive forecasting model
///
/// # Example
///
/// ```rust,ignore
/// use forecast_core::{AdditiveModel, Forecaster};
///
/// let mut model = AdditiveModel::new();
/// model.fit(&timestamps, &values)?;
/// let timeline = model.extend(30)?;
/// let prediction = model.predict(&timeline)?;
/// ```
#[derive(Debug, Clone)]
pub struct AdditiveModel {
    config: ModelConfig,
    state: Option<FittedState>,
}

impl AdditiveModel {
    /// Create a model with default settings
    pub fn new() -> Self {
        Self::with_config(ModelConfig::default())
    }

    pub fn with_config(config: ModelConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Sampling frequency inferred from the history
    pub fn frequency(&self) -> Option<Frequency> {
        self.state.as_ref().map(|s| s.frequency)
    }

    /// Seasonal components in use
    pub fn seasonalities(&self) -> &[SeasonalitySpec] {
        self.state
            .as_ref()
            .map(|s| s.seasonalities.as_slice())
            .unwrap_or(&[])
    }

    pub fn changepoint_count(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.changepoints.len())
    }

    /// Residual standard deviation of the fit, in data units
    pub fn sigma(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.sigma * s.y_scale)
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.state.as_ref().and_then(|s| s.history.last().copied())
    }

    /// Each seasonal component evaluated over one full period.
    ///
    /// Weekly profiles start on a Monday, yearly profiles on January 1st,
    /// daily profiles at midnight.
    pub fn seasonal_profiles(&self) -> Result<Vec<SeasonalProfile>> {
        let state = self.state.as_ref().ok_or(ForecastError::NotFitted)?;

        Ok(state
            .seasonalities
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                let start = profile_start(spec);
                let offsets: Vec<f64> = (0..PROFILE_POINTS)
                    .map(|i| spec.period_days * i as f64 / (PROFILE_POINTS - 1) as f64)
                    .collect();
                let days: Vec<f64> = offsets.iter().map(|o| start + o).collect();
                let values = state.seasonal_component(index, &days);
                SeasonalProfile {
                    name: spec.name.clone(),
                    period_days: spec.period_days,
                    points: offsets.into_iter().zip(values).collect(),
                }
            })
            .collect())
    }
}

impl Default for AdditiveModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Days since the epoch at which a seasonal profile starts
fn profile_start(spec: &SeasonalitySpec) -> f64 {
    let (y, m, d) = if spec.period_days >= 365.0 {
        (2001, 1, 1)
    } else if spec.period_days >= 7.0 {
        (1970, 1, 5)
    } else {
        (1970, 1, 1)
    };
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map_or(0.0, days_since_epoch)
}

/// Join trend and seasonal feature blocks row by row
fn design_matrix(trend_rows: Vec<Vec<f64>>, seasonal_blocks: &[Vec<Vec<f64>>]) -> Vec<Vec<f64>> {
    trend_rows
        .into_iter()
        .enumerate()
        .map(|(i, mut row)| {
            for block in seasonal_blocks {
                row.extend_from_slice(&block[i]);
            }
            row
        })
        .collect()
}

fn residual_variance(x: &[Vec<f64>], y: &[f64], beta: &[f64]) -> f64 {
    let sse: f64 = x
        .iter()
        .zip(y)
        .map(|(row, yi)| {
            let fitted: f64 = row.iter().zip(beta).map(|(a, b)| a * b).sum();
            (yi - fitted).powi(2)
        })
        .sum();
    sse / y.len() as f64
}

impl Forecaster for AdditiveModel {
    fn fit(&mut self, timestamps: &[NaiveDateTime], values: &[f64]) -> Result<()> {
        self.config.validate()?;
        if timestamps.len() != values.len() {
            return Err(ForecastError::InvalidData(format!(
                "{} timestamps for {} values",
                timestamps.len(),
                values.len()
            )));
        }
        if values.len() < 2 {
            return Err(ForecastError::InsufficientData {
                required: 2,
                actual: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidData(
                "values must be finite".to_string(),
            ));
        }

        let mut points: Vec<(NaiveDateTime, f64)> =
            timestamps.iter().copied().zip(values.iter().copied()).collect();
        points.sort_by_key(|(ts, _)| *ts);
        let ts: Vec<NaiveDateTime> = points.iter().map(|(ts, _)| *ts).collect();

        let mut history = ts.clone();
        history.dedup();
        if history.len() < 2 {
            return Err(ForecastError::InsufficientData {
                required: 2,
                actual: history.len(),
            });
        }
        let frequency = infer_frequency(&history)?;

        let days: Vec<f64> = ts.iter().map(|t| days_since_epoch(*t)).collect();
        let t0 = days[0];
        let span_days = days[days.len() - 1] - t0;
        let t: Vec<f64> = days.iter().map(|d| (d - t0) / span_days).collect();

        let max_abs = points.iter().map(|(_, v)| v.abs()).fold(0.0, f64::max);
        let y_scale = if max_abs > 0.0 { max_abs } else { 1.0 };
        let y: Vec<f64> = points.iter().map(|(_, v)| v / y_scale).collect();

        let seasonalities = AutoSeasonality::from_config(&self.config).detect(&history);
        let seasonal_blocks: Vec<Vec<Vec<f64>>> = seasonalities
            .iter()
            .map(|s| fourier_series(&days, s.period_days, s.fourier_order))
            .collect();
        let seasonal_cols: usize = seasonalities.iter().map(|s| s.columns()).sum();

        // Noise scale from a fit without changepoints sets the prior penalties
        let base_rows: Vec<Vec<f64>> = t.iter().map(|&ti| vec![1.0, ti]).collect();
        let x0 = design_matrix(base_rows, &seasonal_blocks);
        let mut penalties0 = vec![BASE_PENALTY; 2];
        penalties0.extend(std::iter::repeat(BASE_PENALTY).take(seasonal_cols));
        let beta0 = ridge_solve(&x0, &y, &penalties0)?;
        let sigma0_sq = residual_variance(&x0, &y, &beta0);

        let delta_penalty =
            (sigma0_sq / self.config.changepoint_prior_scale.powi(2)).max(MIN_DELTA_PENALTY);
        let beta_penalty =
            (sigma0_sq / self.config.seasonality_prior_scale.powi(2)).max(BASE_PENALTY);

        let changepoints = select_changepoints(
            &t,
            self.config.n_changepoints,
            self.config.changepoint_range,
        );
        let trend_rows: Vec<Vec<f64>> = t
            .iter()
            .zip(changepoint_features(&t, &changepoints))
            .map(|(&ti, cp)| {
                let mut row = vec![1.0, ti];
                row.extend(cp);
                row
            })
            .collect();
        let x = design_matrix(trend_rows, &seasonal_blocks);
        let mut penalties = vec![BASE_PENALTY; 2];
        penalties.extend(std::iter::repeat(delta_penalty).take(changepoints.len()));
        penalties.extend(std::iter::repeat(beta_penalty).take(seasonal_cols));
        let beta = ridge_solve(&x, &y, &penalties)?;
        let sigma = residual_variance(&x, &y, &beta).sqrt();

        let n_cp = changepoints.len();
        let deltas = beta[2..2 + n_cp].to_vec();
        let mut seasonal_coefs = Vec::with_capacity(seasonalities.len());
        let mut col = 2 + n_cp;
        for spec in &seasonalities {
            seasonal_coefs.push(beta[col..col + spec.columns()].to_vec());
            col += spec.columns();
        }

        tracing::debug!(
            observations = y.len(),
            changepoints = n_cp,
            seasonalities = ?seasonalities.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            sigma = sigma * y_scale,
            "additive model fitted"
        );

        self.state = Some(FittedState {
            t0,
            span_days,
            y_scale,
            history,
            frequency,
            changepoints,
            offset: beta[0],
            slope: beta[1],
            deltas,
            seasonalities,
            seasonal_coefs,
            sigma,
        });
        Ok(())
    }

    fn extend(&self, horizon: usize) -> Result<Vec<NaiveDateTime>> {
        let state = self.state.as_ref().ok_or(ForecastError::NotFitted)?;
        let last = *state.history.last().ok_or(ForecastError::NotFitted)?;

        let mut timeline = state.history.clone();
        timeline.extend(future_timeline(last, state.frequency, horizon)?);
        Ok(timeline)
    }

    fn predict(&self, timeline: &[NaiveDateTime]) -> Result<Prediction> {
        let state = self.state.as_ref().ok_or(ForecastError::NotFitted)?;

        let days: Vec<f64> = timeline.iter().map(|t| days_since_epoch(*t)).collect();
        let t: Vec<f64> = days.iter().map(|&d| state.scaled_time(d)).collect();

        let trend: Vec<f64> = piecewise_linear(
            &t,
            state.slope,
            state.offset,
            &state.changepoints,
            &state.deltas,
        )
        .into_iter()
        .map(|v| v * state.y_scale)
        .collect();

        let components: Vec<Component> = state
            .seasonalities
            .iter()
            .enumerate()
            .map(|(index, spec)| Component {
                name: spec.name.clone(),
                values: state.seasonal_component(index, &days),
            })
            .collect();

        let yhat: Vec<f64> = (0..timeline.len())
            .map(|i| trend[i] + components.iter().map(|c| c.values[i]).sum::<f64>())
            .collect();

        let std_errors: Vec<f64> = t
            .iter()
            .map(|&ti| {
                let drift = trend_variance(ti, state.changepoints.len(), &state.deltas);
                (state.sigma.powi(2) + drift).sqrt() * state.y_scale
            })
            .collect();
        let interval =
            NormalIntervalComputer::new().compute(&yhat, &std_errors, self.config.interval_width);

        Ok(Prediction {
            timestamps: timeline.to_vec(),
            yhat,
            lower: interval.lower,
            upper: interval.upper,
            trend,
            components,
        })
    }

    fn is_fitted(&self) -> bool {
        self.state.is_some()
    }
}
