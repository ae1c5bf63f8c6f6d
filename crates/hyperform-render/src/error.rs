//! Error types for rendering.

use hyperform_core::AffordanceError;
use thiserror::Error;

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors that can occur while rendering a document.
///
/// Rendering is all-or-nothing: any of these aborts the whole document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The affordance model was violated, e.g. a request body rendered as a
    /// scalar field.
    #[error(transparent)]
    Affordance(#[from] AffordanceError),

    /// Writing to the output sink failed.
    #[error("failed to write document: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// None of the acceptable media types is rendered.
    #[error("no renderer for media type {0}")]
    UnsupportedMediaType(String),
}
