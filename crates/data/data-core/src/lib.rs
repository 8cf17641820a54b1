//! Data Core
//!
//! Implementations for the data stages of the forecasting pipeline:
//! ingestion of uploaded delimited text, normalization into a canonical
//! series and export of forecast tables.

pub mod dates;
pub mod export;
pub mod ingest;
pub mod normalize;

pub use dates::{format_timestamp, parse_datetime, parse_number};
pub use export::{data_uri, export_csv, EXPORT_FILE_NAME, EXPORT_HEADER};
pub use ingest::{ingest, sniff_delimiter};
pub use normalize::{detect_columns, normalize};
