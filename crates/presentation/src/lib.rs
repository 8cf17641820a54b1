//! Presentation
//!
//! Renders the uploaded table, the future-only forecast table and the
//! forecast and component charts. Tables are HTML fragments with escaped
//! cell text; charts are standalone SVG documents.

pub mod chart;
pub mod error;
pub mod table;

pub use chart::{component_charts, forecast_chart, render_charts, ChartOptions, Charts, NamedChart};
pub use error::{PresentationError, Result};
pub use table::{escape_html, forecast_table, raw_table, warnings_list, DEFAULT_PREVIEW_ROWS};
