//! Seasonality detection and Fourier features
//!
//! Seasonal components are modelled as truncated Fourier series evaluated on
//! days since the Unix epoch, so the same calendar instant always maps to the
//! same seasonal phase regardless of where the history starts.

use crate::config::{ModelConfig, SeasonalityToggle};
use chrono::{Duration, NaiveDateTime};
use forecast_spi::{SeasonalityDetector, SeasonalitySpec};
use std::f64::consts::PI;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Days since 1970-01-01T00:00:00, with fractional part
pub fn days_since_epoch(ts: NaiveDateTime) -> f64 {
    ts.and_utc().timestamp() as f64 / SECONDS_PER_DAY
        + f64::from(ts.and_utc().timestamp_subsec_nanos()) / (SECONDS_PER_DAY * 1e9)
}

/// Fourier features for one seasonality.
///
/// Returns one row per input time with `2 * order` columns laid out as
/// `[sin(2πkt/P), cos(2πkt/P)]` for `k = 1..=order`.
pub fn fourier_series(t_days: &[f64], period_days: f64, order: usize) -> Vec<Vec<f64>> {
    t_days
        .iter()
        .map(|&t| {
            let mut row = Vec::with_capacity(2 * order);
            for k in 1..=order {
                let x = 2.0 * PI * k as f64 * t / period_days;
                row.push(x.sin());
                row.push(x.cos());
            }
            row
        })
        .collect()
}

/// Enables seasonalities from the history's span and spacing unless a
/// toggle forces the decision.
///
/// * yearly: at least two years of history
/// * weekly: at least two weeks, sampled more often than weekly
/// * daily: at least two days, sampled more often than daily
#[derive(Debug, Clone, Copy)]
pub struct AutoSeasonality {
    yearly: SeasonalityToggle,
    weekly: SeasonalityToggle,
    daily: SeasonalityToggle,
}

impl AutoSeasonality {
    pub fn new() -> Self {
        Self::from_config(&ModelConfig::default())
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            yearly: config.yearly,
            weekly: config.weekly,
            daily: config.daily,
        }
    }
}

impl Default for AutoSeasonality {
    fn default() -> Self {
        Self::new()
    }
}

impl SeasonalityDetector for AutoSeasonality {
    fn detect(&self, timestamps: &[NaiveDateTime]) -> Vec<SeasonalitySpec> {
        let (first, last) = match (timestamps.first(), timestamps.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Vec::new(),
        };
        let span = last - first;
        let min_spacing = timestamps
            .windows(2)
            .map(|w| w[1] - w[0])
            .filter(|d| *d > Duration::zero())
            .min();
        let finer_than = |period: Duration| min_spacing.is_some_and(|d| d < period);

        let candidates = [
            (self.yearly, SeasonalitySpec::yearly(), span >= Duration::days(730)),
            (
                self.weekly,
                SeasonalitySpec::weekly(),
                span >= Duration::days(14) && finer_than(Duration::days(7)),
            ),
            (
                self.daily,
                SeasonalitySpec::daily(),
                span >= Duration::days(2) && finer_than(Duration::days(1)),
            ),
        ];

        candidates
            .into_iter()
            .filter(|(toggle, _, auto)| match toggle {
                SeasonalityToggle::Enabled => true,
                SeasonalityToggle::Disabled => false,
                SeasonalityToggle::Auto => *auto,
            })
            .map(|(_, spec, _)| spec)
            .collect()
    }
}
