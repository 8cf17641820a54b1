//! Forecast Facade
//!
//! High-level API for the forecasting engine. Re-exports all public types
//! from the forecast stack for convenient usage.
//!
//! - `forecast_spi` - Engine contract, prediction model and errors
//! - `forecast_core` - Additive model, frequency inference, seasonality and intervals

// Re-export SPI
pub use forecast_spi::*;

// Re-export core, including its modules for direct access
pub use forecast_core::*;
pub use forecast_core::{additive, confidence, config, frequency, seasonality, solver, trend};
