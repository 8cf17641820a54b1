//! Identities of memoized stages.
//!
//! A stage's cached output is reused only while the key it was computed
//! from is unchanged.

use data_spi::{ColumnSelection, ForecastHorizon};
use serde::{Deserialize, Serialize};

/// Normalization input: uploaded file hash plus column choice
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizeKey {
    pub file_hash: String,
    pub selection: ColumnSelection,
}

impl NormalizeKey {
    pub fn new(file_hash: impl Into<String>, selection: ColumnSelection) -> Self {
        Self {
            file_hash: file_hash.into(),
            selection,
        }
    }
}

/// A fit depends on nothing but the normalized series
pub type FitKey = NormalizeKey;

/// Forecast input: the fitted model plus the horizon
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForecastKey {
    pub fit: FitKey,
    pub horizon: ForecastHorizon,
}

impl ForecastKey {
    pub fn new(fit: FitKey, horizon: ForecastHorizon) -> Self {
        Self { fit, horizon }
    }
}
