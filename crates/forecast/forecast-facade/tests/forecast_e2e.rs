//! End-to-end tests for the forecast crates
//!
//! Fit, extend, predict and filter a daily history using only this crate's API.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use forecast_facade::{AdditiveModel, Forecaster, Prediction};

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2021, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn history(n: usize) -> (Vec<NaiveDateTime>, Vec<f64>) {
    let ts: Vec<NaiveDateTime> = (0..n).map(|i| start() + Duration::days(i as i64)).collect();
    let values = ts
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let weekend = if t.weekday().number_from_monday() >= 6 { -4.0 } else { 1.0 };
            200.0 + i as f64 * 0.8 + weekend
        })
        .collect();
    (ts, values)
}

fn forecast(n: usize, horizon: usize) -> (AdditiveModel, Prediction) {
    let (ts, values) = history(n);
    let mut model = AdditiveModel::new();
    model.fit(&ts, &values).unwrap();
    let timeline = model.extend(horizon).unwrap();
    let prediction = model.predict(&timeline).unwrap();
    (model, prediction)
}

#[test]
fn e2e_future_only_rows() {
    let (model, prediction) = forecast(100, 30);
    let last = model.last_timestamp().unwrap();
    assert_eq!(last, start() + Duration::days(99));

    let future = prediction.after(last);
    assert_eq!(future.len(), 30);
    assert_eq!(future.timestamps[0], start() + Duration::days(100));
    assert_eq!(future.timestamps[29], start() + Duration::days(129));
    assert!(future.timestamps.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn e2e_weekly_pattern_carried_forward() {
    let (model, prediction) = forecast(120, 14);
    let future = prediction.after(model.last_timestamp().unwrap());

    // Weekend values sit below their neighbouring weekdays
    for i in 1..future.len() - 1 {
        let is_weekend = future.timestamps[i].weekday().number_from_monday() >= 6;
        let next_weekday = future.timestamps[i + 1].weekday().number_from_monday() == 1;
        if is_weekend && next_weekday {
            assert!(future.yhat[i] < future.yhat[i + 1]);
        }
    }

    let profiles = model.seasonal_profiles().unwrap();
    assert_eq!(profiles[0].name, "weekly");
}

#[test]
fn e2e_horizon_bounds() {
    let (model, _) = forecast(50, 1);
    assert_eq!(model.extend(1).unwrap().len(), 51);
    assert_eq!(model.extend(365).unwrap().len(), 50 + 365);
}

#[test]
fn e2e_repeatable() {
    let (_, a) = forecast(80, 20);
    let (_, b) = forecast(80, 20);
    assert_eq!(a, b);
}
