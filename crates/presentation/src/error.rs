//! Presentation errors

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PresentationError {
    /// A chart or table could not be drawn
    #[error("Render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, PresentationError>;

impl<E: std::error::Error + Send + Sync + 'static> From<DrawingAreaErrorKind<E>>
    for PresentationError
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        PresentationError::Render(format!("chart drawing failed: {}", err))
    }
}
