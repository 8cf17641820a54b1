//! Frequency inference and future timelines

use chrono::{Duration, Months, NaiveDateTime};
use forecast_spi::{end_of_month, is_month_end, ForecastError, Frequency, Prediction, Result};
use std::collections::BTreeMap;

/// Infer the sampling frequency of a sorted history.
///
/// Uses the most common positive gap between consecutive distinct
/// timestamps (the smaller gap wins ties). When at least half of the gaps are
/// whole calendar months (or years), the frequency is calendar based so that
/// month lengths are respected. A calendar history made only of month-end
/// dates stays anchored to the end of the month.
pub fn infer_frequency(timestamps: &[NaiveDateTime]) -> Result<Frequency> {
    let gaps: Vec<(NaiveDateTime, NaiveDateTime)> = timestamps
        .windows(2)
        .filter(|w| w[1] > w[0])
        .map(|w| (w[0], w[1]))
        .collect();

    if gaps.is_empty() {
        return Err(ForecastError::InsufficientData {
            required: 2,
            actual: usize::from(!timestamps.is_empty()),
        });
    }

    let month_ends = timestamps.iter().all(|t| is_month_end(*t));
    for months in [12u32, 3, 1] {
        let calendar = gaps
            .iter()
            .filter(|(a, b)| {
                let stepped = a.checked_add_months(Months::new(months));
                stepped == Some(*b) || (month_ends && stepped.and_then(end_of_month) == Some(*b))
            })
            .count();
        if calendar * 2 >= gaps.len() {
            return Ok(if month_ends {
                Frequency::MonthEnd(months)
            } else {
                Frequency::Monthly(months)
            });
        }
    }

    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for (a, b) in &gaps {
        *counts.entry((*b - *a).num_seconds()).or_insert(0) += 1;
    }
    let (secs, _) = counts
        .iter()
        .fold((0i64, 0usize), |best, (&secs, &n)| if n > best.1 { (secs, n) } else { best });

    if secs <= 0 {
        return Err(ForecastError::InvalidData(
            "timestamps are less than a second apart".to_string(),
        ));
    }
    Ok(Frequency::Fixed(Duration::seconds(secs)))
}

/// `horizon` timestamps following `last` at `frequency`.
pub fn future_timeline(
    last: NaiveDateTime,
    frequency: Frequency,
    horizon: usize,
) -> Result<Vec<NaiveDateTime>> {
    (1..=horizon)
        .map(|k| {
            u32::try_from(k)
                .ok()
                .and_then(|k| frequency.advance(last, k))
                .ok_or_else(|| {
                    ForecastError::NumericalError(format!(
                        "timestamp out of range {} periods after {}",
                        k, last
                    ))
                })
        })
        .collect()
}

/// Rows of `prediction` strictly after the last observed timestamp
pub fn future_only(prediction: &Prediction, last_observed: NaiveDateTime) -> Prediction {
    prediction.after(last_observed)
}
