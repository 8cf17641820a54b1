//! Piecewise-linear trend
//!
//! Time is scaled so the history spans `[0, 1]`. The trend is
//! `k·t + m + Σ δⱼ·(t − sⱼ)₊` over changepoints `sⱼ`.

/// Changepoint locations on the scaled time axis.
///
/// Placed at evenly spaced observations within the first
/// `changepoint_range` share of the history, never at the first point.
pub fn select_changepoints(t: &[f64], n_changepoints: usize, changepoint_range: f64) -> Vec<f64> {
    let hist_size = (t.len() as f64 * changepoint_range).floor() as usize;
    if hist_size < 2 || n_changepoints == 0 {
        return Vec::new();
    }
    let n = n_changepoints.min(hist_size - 1);
    let last = (hist_size - 1) as f64;

    let mut points: Vec<f64> = (1..=n)
        .map(|i| {
            let idx = (i as f64 * last / n as f64).round() as usize;
            t[idx.min(t.len() - 1)]
        })
        .collect();
    points.dedup();
    points
}

/// Changepoint indicator columns `(t − sⱼ)₊`, one row per time
pub fn changepoint_features(t: &[f64], changepoints: &[f64]) -> Vec<Vec<f64>> {
    t.iter()
        .map(|&ti| changepoints.iter().map(|&s| (ti - s).max(0.0)).collect())
        .collect()
}

/// Evaluate the trend at each scaled time
pub fn piecewise_linear(t: &[f64], slope: f64, offset: f64, changepoints: &[f64], deltas: &[f64]) -> Vec<f64> {
    t.iter()
        .map(|&ti| {
            let bends: f64 = changepoints
                .iter()
                .zip(deltas)
                .map(|(&s, &d)| d * (ti - s).max(0.0))
                .sum();
            offset + slope * ti + bends
        })
        .collect()
}

/// Variance of future trend drift at scaled time `t`.
///
/// Beyond the history, changepoints keep arriving at the historical rate
/// with slope changes of the historical mean magnitude. Integrating the
/// resulting random walk in slope gives a variance growing with `(t − 1)³`.
/// Zero within the history.
pub fn trend_variance(t: f64, n_changepoints: usize, deltas: &[f64]) -> f64 {
    if t <= 1.0 || n_changepoints == 0 {
        return 0.0;
    }
    let mean_abs = if deltas.is_empty() {
        0.0
    } else {
        deltas.iter().map(|d| d.abs()).sum::<f64>() / deltas.len() as f64
    };
    let scale = mean_abs + 1e-8;
    let h = t - 1.0;
    n_changepoints as f64 * 2.0 * scale * scale * h.powi(3) / 3.0
}
