//! Forecasting session
//!
//! A `Session` owns everything one user has produced: the uploaded table,
//! the normalized series, the fitted model, the latest forecast and its
//! charts. Each stage is cached together with the key it was computed from
//! and recomputed only when that key changes, which also invalidates every
//! later stage. A failing step drops its own output and everything after
//! it, while earlier outputs stay in place. The failure is recorded as the
//! session's last error.

use crate::engine::{fit_series, FittedModel};
use crate::hash::file_hash;
use data_core::{detect_columns, export_csv, ingest, normalize};
use data_spi::{ColumnSelection, DataError, ForecastHorizon, Normalized, RawTable};
use pipeline_spi::{
    FitKey, ForecastKey, ForecastOutput, NormalizeKey, PipelineError, PipelineState, Result,
};
use presentation::{render_charts, ChartOptions, Charts, PresentationError};
use std::sync::Arc;

/// The current upload
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    /// Hex SHA-256 of the file contents
    pub hash: String,
    pub size: usize,
    pub table: Arc<RawTable>,
    /// Column choice guessed from names and types
    pub suggested: Option<ColumnSelection>,
}

#[derive(Debug, Default)]
pub struct Session {
    state: PipelineState,
    upload: Option<Upload>,
    normalized: Option<(NormalizeKey, Arc<Normalized>)>,
    fitted: Option<(FitKey, FittedModel)>,
    forecast: Option<(ForecastKey, Arc<ForecastOutput>)>,
    charts: Option<(ForecastKey, Arc<Charts>)>,
    chart_options: ChartOptions,
    last_error: Option<PipelineError>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chart_options(mut self, options: ChartOptions) -> Self {
        self.chart_options = options;
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Error of the most recent failed step, cleared by the next success
    pub fn last_error(&self) -> Option<&PipelineError> {
        self.last_error.as_ref()
    }

    pub fn upload_info(&self) -> Option<&Upload> {
        self.upload.as_ref()
    }

    pub fn table(&self) -> Option<&RawTable> {
        self.upload.as_ref().map(|u| u.table.as_ref())
    }

    pub fn normalized(&self) -> Option<&Normalized> {
        self.normalized.as_ref().map(|(_, n)| n.as_ref())
    }

    pub fn forecast_output(&self) -> Option<&ForecastOutput> {
        self.forecast.as_ref().map(|(_, f)| f.as_ref())
    }

    pub fn cached_charts(&self) -> Option<&Charts> {
        self.charts.as_ref().map(|(_, c)| c.as_ref())
    }

    /// Columns of the latest normalization, else the suggested ones
    pub fn selection(&self) -> Option<&ColumnSelection> {
        self.normalized
            .as_ref()
            .map(|(key, _)| &key.selection)
            .or_else(|| self.upload.as_ref().and_then(|u| u.suggested.as_ref()))
    }

    pub fn horizon(&self) -> Option<ForecastHorizon> {
        self.forecast.as_ref().map(|(key, _)| key.horizon)
    }

    /// Ingest an uploaded file and return to `FileUploaded`.
    ///
    /// Re-uploading identical bytes keeps the cached stages, which stay
    /// valid for the same file hash. A file that cannot be read keeps the
    /// previous table but drops everything computed from it.
    pub fn upload(&mut self, file_name: Option<String>, bytes: &[u8]) -> Result<&Upload> {
        let hash = file_hash(bytes);
        let upload = match self.upload.take() {
            Some(mut current) if current.hash == hash => {
                tracing::debug!(%hash, "upload unchanged, keeping cached stages");
                current.file_name = file_name;
                current
            }
            previous => match read_upload(file_name, hash, bytes) {
                Ok(upload) => {
                    self.normalized = None;
                    self.invalidate_fit();
                    upload
                }
                Err(err) => {
                    self.upload = previous;
                    return self.settle(PipelineState::Normalized, Err(err));
                }
            },
        };

        self.last_error = None;
        self.state = PipelineState::FileUploaded;
        Ok(self.upload.insert(upload))
    }

    /// Select and coerce the date and metric columns
    pub fn normalize(&mut self, selection: ColumnSelection) -> Result<Arc<Normalized>> {
        let result = self.try_normalize(selection);
        self.settle(PipelineState::Normalized, result)
    }

    fn try_normalize(&mut self, selection: ColumnSelection) -> Result<Arc<Normalized>> {
        let upload = self
            .upload
            .as_ref()
            .ok_or(PipelineError::NotReady("normalize"))?;
        let key = NormalizeKey::new(upload.hash.clone(), selection);

        if let Some((cached_key, normalized)) = &self.normalized {
            if *cached_key == key {
                tracing::debug!("normalization cache hit");
                let normalized = Arc::clone(normalized);
                self.reach(PipelineState::Normalized);
                return Ok(normalized);
            }
        }

        let normalized = Arc::new(normalize(&upload.table, &key.selection)?);
        if !normalized.warnings.is_empty() {
            tracing::warn!(
                dropped = normalized.warnings.len(),
                kept = normalized.series.len(),
                "rows dropped during normalization"
            );
        }

        self.normalized = Some((key, Arc::clone(&normalized)));
        self.invalidate_fit();
        self.state = PipelineState::Normalized;
        Ok(normalized)
    }

    /// Fit the model to the normalized series
    pub fn fit(&mut self) -> Result<()> {
        let result = self.try_fit();
        self.settle(PipelineState::Fitted, result)
    }

    fn try_fit(&mut self) -> Result<()> {
        let (key, normalized) = self
            .normalized
            .as_ref()
            .ok_or(PipelineError::NotReady("fit"))?;

        if self.fitted.as_ref().is_some_and(|(k, _)| k == key) {
            tracing::debug!("fit cache hit");
            self.reach(PipelineState::Fitted);
            return Ok(());
        }

        let model = fit_series(&normalized.series)?;
        self.fitted = Some((key.clone(), model));
        self.forecast = None;
        self.charts = None;
        self.state = PipelineState::Fitted;
        Ok(())
    }

    /// Forecast `horizon` periods past the last observation
    pub fn forecast(&mut self, horizon: ForecastHorizon) -> Result<Arc<ForecastOutput>> {
        let result = self.try_forecast(horizon);
        self.settle(PipelineState::Forecasted, result)
    }

    fn try_forecast(&mut self, horizon: ForecastHorizon) -> Result<Arc<ForecastOutput>> {
        let (fit_key, model) = self
            .fitted
            .as_mut()
            .ok_or(PipelineError::NotReady("forecast"))?;
        let key = ForecastKey::new(fit_key.clone(), horizon);

        if let Some((cached_key, output)) = &self.forecast {
            if *cached_key == key {
                let output = Arc::clone(output);
                self.reach(PipelineState::Forecasted);
                return Ok(output);
            }
        }

        let output = model.forecast(horizon)?;
        self.forecast = Some((key, Arc::clone(&output)));
        self.charts = None;
        self.state = PipelineState::Forecasted;
        Ok(output)
    }

    /// Charts for the current forecast
    pub fn charts(&mut self) -> Result<Arc<Charts>> {
        let result = self.try_charts();
        self.record(result)
    }

    fn try_charts(&mut self) -> Result<Arc<Charts>> {
        let (key, output) = self
            .forecast
            .as_ref()
            .ok_or(PipelineError::NotReady("chart"))?;
        if let Some((cached_key, charts)) = &self.charts {
            if cached_key == key {
                return Ok(Arc::clone(charts));
            }
        }
        let (_, normalized) = self
            .normalized
            .as_ref()
            .ok_or(PipelineError::NotReady("chart"))?;

        let charts = render_charts(
            &normalized.series,
            &output.prediction,
            &output.profiles,
            &self.chart_options,
        )
        .map_err(|err| match err {
            PresentationError::Render(msg) => PipelineError::Render(msg),
        })?;
        let charts = Arc::new(charts);
        self.charts = Some((key.clone(), Arc::clone(&charts)));
        Ok(charts)
    }

    /// Normalize, fit, forecast and chart in one go.
    ///
    /// `horizon` is validated here so an out-of-range value is reported like
    /// any other failure of the forecast step.
    pub fn run(&mut self, selection: ColumnSelection, horizon: i64) -> Result<Arc<ForecastOutput>> {
        self.run_checked(selection, ForecastHorizon::new(horizon))
    }

    /// [`Session::run`] with the horizon as typed into a form
    pub fn run_text(
        &mut self,
        selection: ColumnSelection,
        horizon: &str,
    ) -> Result<Arc<ForecastOutput>> {
        self.run_checked(selection, horizon.parse())
    }

    fn run_checked(
        &mut self,
        selection: ColumnSelection,
        horizon: std::result::Result<ForecastHorizon, DataError>,
    ) -> Result<Arc<ForecastOutput>> {
        let horizon = self.settle(PipelineState::Forecasted, horizon.map_err(PipelineError::from))?;
        self.normalize(selection)?;
        self.fit()?;
        let output = self.forecast(horizon)?;
        self.charts()?;
        Ok(output)
    }

    /// The future-only forecast as CSV
    pub fn export(&mut self) -> Result<String> {
        let result = self.try_export();
        self.record(result)
    }

    fn try_export(&mut self) -> Result<String> {
        let (_, output) = self
            .forecast
            .as_ref()
            .ok_or(PipelineError::NotReady("export"))?;
        let csv = export_csv(&output.rows)?;
        tracing::info!(rows = output.rows.len(), bytes = csv.len(), "forecast exported");
        self.state = PipelineState::Exported;
        Ok(csv)
    }

    /// Record a failure raised outside the pipeline steps, such as a form
    /// submission without a file
    pub fn report(&mut self, err: PipelineError) {
        let _ = self.record::<()>(Err(err));
    }

    /// Drop `stage` and every later one, stepping the state back to the
    /// last stage still held
    fn discard_from(&mut self, stage: PipelineState) {
        if stage <= PipelineState::Normalized {
            self.normalized = None;
        }
        if stage <= PipelineState::Fitted {
            self.fitted = None;
        }
        if stage <= PipelineState::Forecasted {
            self.forecast = None;
            self.charts = None;
        }
        let held = match stage {
            PipelineState::NoFile | PipelineState::FileUploaded | PipelineState::Normalized => {
                PipelineState::FileUploaded
            }
            PipelineState::Fitted => PipelineState::Normalized,
            PipelineState::Forecasted | PipelineState::Exported => PipelineState::Fitted,
        };
        self.state = self.state.min(held);
    }

    /// Record the outcome of the step producing `stage`
    fn settle<T>(&mut self, stage: PipelineState, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.discard_from(stage);
        }
        self.record(result)
    }

    fn invalidate_fit(&mut self) {
        self.fitted = None;
        self.forecast = None;
        self.charts = None;
    }

    /// Advance to `state` on a cache hit without stepping back
    fn reach(&mut self, state: PipelineState) {
        self.state = self.state.max(state);
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(kind = %err.kind(), error = %err, state = %self.state, "pipeline step failed");
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }
}

fn read_upload(file_name: Option<String>, hash: String, bytes: &[u8]) -> Result<Upload> {
    let table = ingest(bytes)?;
    let suggested = detect_columns(&table);
    tracing::info!(
        hash = %hash,
        bytes = bytes.len(),
        rows = table.len(),
        columns = table.headers().len(),
        "file uploaded"
    );
    Ok(Upload {
        file_name,
        hash,
        size: bytes.len(),
        table: Arc::new(table),
        suggested,
    })
}
