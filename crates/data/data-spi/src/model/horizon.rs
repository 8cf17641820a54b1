//! Validated forecast horizon.

use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of future periods to forecast, 1 to 365 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct ForecastHorizon(u32);

impl ForecastHorizon {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 365;

    /// Validate a horizon value.
    pub fn new(value: i64) -> Result<Self> {
        if value < Self::MIN as i64 || value > Self::MAX as i64 {
            return Err(DataError::InvalidHorizon {
                value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(value as u32))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn periods(&self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<i64> for ForecastHorizon {
    type Error = DataError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

/// Parse a horizon typed by the user, surrounding whitespace ignored
impl FromStr for ForecastHorizon {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let value = s
            .parse::<i64>()
            .map_err(|_| DataError::HorizonNotANumber(s.to_string()))?;
        Self::new(value)
    }
}

impl From<ForecastHorizon> for u32 {
    fn from(h: ForecastHorizon) -> u32 {
        h.0
    }
}

impl fmt::Display for ForecastHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
