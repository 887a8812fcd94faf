//! Failures of the watermark pipeline.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WatermarkError {
    /// Opacity, density, font size or text out of range
    #[error("Invalid watermark settings: {0}")]
    ConfigError(String),

    #[error("No usable font: {0}")]
    FontLoadError(String),

    /// Text measured or rasterised to nothing
    #[error("Watermark text could not be drawn: {0}")]
    RenderError(String),

    /// Layer and base disagree in size, or a crop fell outside the canvas
    #[error("Overlay blend failed: {0}")]
    CompositeError(String),
}

impl WatermarkError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ConfigError(_))
    }
}
