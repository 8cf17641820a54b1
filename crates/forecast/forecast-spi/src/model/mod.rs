//! Model module containing data structures

mod confidence_interval;
mod frequency;
mod prediction;
mod seasonality;

pub use confidence_interval::ConfidenceInterval;
pub use frequency::{end_of_month, is_month_end, Frequency};
pub use prediction::{Component, Prediction};
pub use seasonality::{SeasonalProfile, SeasonalitySpec};
