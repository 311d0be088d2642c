//! Error types for artifact rendering
//!
//! Unknown tones and malformed palette colors are not errors; they fall back
//! to defaults. Everything here aborts the whole render.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Error, Debug)]
pub enum RenderError {
    /// Analysis input is unusable (e.g. wrong number of sentences)
    #[error("Invalid analysis: {0}")]
    InvalidAnalysis(String),

    /// Text measurement failed
    #[error("Text measurement failed: {0}")]
    Measure(String),

    /// A draw operation could not be executed
    #[error("Draw failed: {0}")]
    Draw(String),

    /// Raster surface could not be allocated
    #[error("Surface error: {0}")]
    Surface(String),

    /// Font data could not be loaded or parsed
    #[error("Font error: {0}")]
    Font(String),

    /// PNG encoding failed
    #[error("Encode error: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
