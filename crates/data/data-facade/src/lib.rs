//! Data Facade
//!
//! Unified re-exports for the data stages.
//!
//! This facade provides a single entry point for all data functionality:
//! - `data_spi` - Data model and errors
//! - `data_core` - Ingestion, normalization and export
//!
//! # Example
//!
//! ```rust
//! use data_facade::{ingest, normalize, ColumnSelection};
//!
//! let table = ingest(b"ds,y\n2021-01-01,1\n2021-01-02,2\n").unwrap();
//! let normalized = normalize(&table, &ColumnSelection::new("ds", "y")).unwrap();
//! assert_eq!(normalized.series.len(), 2);
//! ```

// Re-export everything from SPI
pub use data_spi::*;

// Re-export everything from Core
pub use data_core::*;
