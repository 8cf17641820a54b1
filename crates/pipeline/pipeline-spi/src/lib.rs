//! Pipeline Service Provider Interface
//!
//! Defines the session state machine, the keys that identify memoized
//! stages, the output of a forecast run and the error taxonomy every stage
//! failure is reported in.

pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use error::{ErrorKind, PipelineError, Result};
pub use model::{FitKey, ForecastKey, ForecastOutput, NormalizeKey, PipelineState};
