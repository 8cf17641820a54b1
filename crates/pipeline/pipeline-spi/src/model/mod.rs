//! Pipeline models.

mod keys;
mod output;
mod state;

pub use keys::{FitKey, ForecastKey, NormalizeKey};
pub use output::ForecastOutput;
pub use state::PipelineState;
