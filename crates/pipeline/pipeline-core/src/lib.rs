//! Pipeline Core
//!
//! The per-user forecasting session. Each stage (upload, normalization,
//! fit, forecast, charts, export) is memoized by the identity of its inputs
//! and the session tracks how far the pipeline has progressed.

pub mod engine;
pub mod hash;
pub mod session;

// Re-export SPI types used by callers
pub use pipeline_spi::{
    ErrorKind, FitKey, ForecastKey, ForecastOutput, NormalizeKey, PipelineError, PipelineState,
    Result,
};

pub use engine::{fit_series, FittedModel};
pub use hash::file_hash;
pub use session::{Session, Upload};
