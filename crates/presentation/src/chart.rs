//! SVG charts
//!
//! Time axes are plotted as days since the Unix epoch and labelled as
//! calendar dates.

use crate::error::{PresentationError, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use data_spi::{Series, VALUE_COLUMN};
use forecast_spi::{Prediction, SeasonalProfile};
use plotters::prelude::*;
use std::ops::Range;

const SECONDS_PER_DAY: f64 = 86_400.0;
const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Pixel sizes of the rendered charts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    /// Height of each component chart
    pub component_height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 900,
            height: 420,
            component_height: 260,
        }
    }
}

/// One SVG chart with the component it shows
#[derive(Debug, Clone, PartialEq)]
pub struct NamedChart {
    pub name: String,
    pub svg: String,
}

/// All charts for one forecast
#[derive(Debug, Clone, PartialEq)]
pub struct Charts {
    pub forecast: String,
    /// Trend first, then each active seasonality
    pub components: Vec<NamedChart>,
}

/// Render the forecast chart followed by the component charts
pub fn render_charts(
    series: &Series,
    prediction: &Prediction,
    profiles: &[SeasonalProfile],
    options: &ChartOptions,
) -> Result<Charts> {
    let charts = Charts {
        forecast: forecast_chart(series, prediction, options)?,
        components: component_charts(prediction, profiles, options)?,
    };
    tracing::debug!(
        components = charts.components.len(),
        bytes = charts.forecast.len(),
        "charts rendered"
    );
    Ok(charts)
}

/// Observed values as black dots, the prediction as a blue line and the
/// uncertainty interval as a shaded band
pub fn forecast_chart(
    series: &Series,
    prediction: &Prediction,
    options: &ChartOptions,
) -> Result<String> {
    if prediction.is_empty() {
        return Err(PresentationError::Render(
            "forecast chart has nothing to plot".to_string(),
        ));
    }

    let observed: Vec<(f64, f64)> = series
        .rows()
        .iter()
        .map(|r| (to_x(r.timestamp), r.value))
        .collect();
    let xs: Vec<f64> = prediction.timestamps.iter().map(|t| to_x(*t)).collect();

    let x_range = padded(observed.iter().map(|p| p.0).chain(xs.iter().copied()))?;
    let y_range = padded(
        observed
            .iter()
            .map(|p| p.1)
            .chain(prediction.yhat.iter().copied())
            .chain(prediction.lower.iter().copied())
            .chain(prediction.upper.iter().copied()),
    )?;
    let with_time = x_range.end - x_range.start < 3.0;

    let band: Vec<(f64, f64)> = xs
        .iter()
        .zip(&prediction.upper)
        .map(|(x, u)| (*x, *u))
        .chain(xs.iter().zip(&prediction.lower).rev().map(|(x, l)| (*x, *l)))
        .collect();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Forecast", ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(&|x| date_label(*x, with_time))
            .y_desc(VALUE_COLUMN)
            .draw()?;

        let band_color = BLUE.mix(0.2);
        chart
            .draw_series(std::iter::once(Polygon::new(band, band_color.filled())))?
            .label("uncertainty interval")
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], band_color.filled()));

        chart
            .draw_series(LineSeries::new(
                xs.iter().copied().zip(prediction.yhat.iter().copied()),
                BLUE.stroke_width(2),
            ))?
            .label("predicted")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

        chart
            .draw_series(
                observed
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 2, BLACK.filled())),
            )?
            .label("observed")
            .legend(|(x, y)| Circle::new((x + 10, y), 3, BLACK.filled()));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
    }
    Ok(svg)
}

/// Trend over the prediction timeline, then one chart per seasonal profile
pub fn component_charts(
    prediction: &Prediction,
    profiles: &[SeasonalProfile],
    options: &ChartOptions,
) -> Result<Vec<NamedChart>> {
    let mut charts = Vec::with_capacity(profiles.len() + 1);

    let trend: Vec<(f64, f64)> = prediction
        .timestamps
        .iter()
        .zip(&prediction.trend)
        .map(|(t, v)| (to_x(*t), *v))
        .collect();
    let with_time = match (trend.first(), trend.last()) {
        (Some(first), Some(last)) => last.0 - first.0 < 3.0,
        _ => false,
    };
    charts.push(NamedChart {
        name: "trend".to_string(),
        svg: line_chart("trend", &trend, &|x| date_label(*x, with_time), options)?,
    });

    for profile in profiles {
        let period = profile.period_days;
        let svg = line_chart(
            &profile.name,
            &profile.points,
            &|x| seasonal_label(*x, period),
            options,
        )?;
        charts.push(NamedChart {
            name: profile.name.clone(),
            svg,
        });
    }
    Ok(charts)
}

fn line_chart(
    title: &str,
    points: &[(f64, f64)],
    x_formatter: &dyn Fn(&f64) -> String,
    options: &ChartOptions,
) -> Result<String> {
    if points.is_empty() {
        return Err(PresentationError::Render(format!(
            "{} chart has nothing to plot",
            title
        )));
    }
    let x_range = padded(points.iter().map(|p| p.0))?;
    let y_range = padded(points.iter().map(|p| p.1))?;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.component_height))
            .into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 16))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(x_formatter)
            .draw()?;

        chart.draw_series(LineSeries::new(
            points.iter().copied(),
            BLUE.stroke_width(2),
        ))?;

        root.present()?;
    }
    Ok(svg)
}

fn to_x(ts: NaiveDateTime) -> f64 {
    ts.and_utc().timestamp() as f64 / SECONDS_PER_DAY
}

fn date_label(x: f64, with_time: bool) -> String {
    match DateTime::from_timestamp((x * SECONDS_PER_DAY).round() as i64, 0) {
        Some(dt) if with_time => dt.naive_utc().format("%m-%d %H:%M").to_string(),
        Some(dt) => dt.naive_utc().format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

/// Axis label for an offset into a seasonal period
fn seasonal_label(offset_days: f64, period_days: f64) -> String {
    if period_days >= 365.0 {
        NaiveDate::from_ymd_opt(2001, 1, 1)
            .and_then(|d| d.checked_add_signed(Duration::days(offset_days.floor() as i64)))
            .map(|d| d.format("%B %-d").to_string())
            .unwrap_or_default()
    } else if period_days >= 7.0 {
        WEEKDAYS[(offset_days.floor() as i64).rem_euclid(7) as usize].to_string()
    } else {
        format!("{:02}:00", ((offset_days * 24.0).round() as i64).rem_euclid(24))
    }
}

/// Range covering all values with a 5% margin, widened when flat
fn padded(values: impl Iterator<Item = f64>) -> Result<Range<f64>> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return Err(PresentationError::Render(
            "chart values are empty or not finite".to_string(),
        ));
    }
    let span = max - min;
    if span.abs() < 1e-12 {
        let pad = if min.abs() > 0.0 { min.abs() * 0.1 } else { 1.0 };
        return Ok(min - pad..max + pad);
    }
    Ok(min - span * 0.05..max + span * 0.05)
}
