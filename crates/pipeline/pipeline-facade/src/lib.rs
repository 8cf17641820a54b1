//! Pipeline Facade
//!
//! Unified re-exports for the session pipeline.
//!
//! - `pipeline_spi` - State machine, stage keys, forecast output and errors
//! - `pipeline_core` - Session, engine adapter and upload hashing
//!
//! # Example
//!
//! ```rust,ignore
//! use pipeline_facade::Session;
//!
//! let mut session = Session::new();
//! session.upload(Some("sales.csv".into()), bytes)?;
//! let output = session.run(ColumnSelection::new("ds", "y"), 30)?;
//! let csv = session.export()?;
//! ```

// Re-export everything from SPI
pub use pipeline_spi::*;

// Re-export everything from Core
pub use pipeline_core::*;
