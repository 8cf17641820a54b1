//! Session state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How far a session has progressed through the pipeline.
///
/// `NoFile → FileUploaded → Normalized → Fitted → Forecasted → Exported`.
/// A new upload always returns to `FileUploaded`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    #[default]
    NoFile,
    FileUploaded,
    Normalized,
    Fitted,
    Forecasted,
    Exported,
}

impl PipelineState {
    /// True once the state has reached at least `other`
    pub fn has_reached(&self, other: PipelineState) -> bool {
        *self >= other
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::NoFile => "no file",
            PipelineState::FileUploaded => "file uploaded",
            PipelineState::Normalized => "normalized",
            PipelineState::Fitted => "fitted",
            PipelineState::Forecasted => "forecasted",
            PipelineState::Exported => "exported",
        };
        f.write_str(name)
    }
}
