//! Error types for data operations.

mod data_error;

pub use data_error::{DataError, Result};
