//! Error types for canvas2d-engine.
//!
//! Property setters never fail: invalid values are ignored and logged. Only the
//! operations that the canvas API defines as throwing return one of these.

use thiserror::Error;

/// Result type alias using Canvas2dError.
pub type Canvas2dResult<T> = Result<T, Canvas2dError>;

/// Errors that can occur in Canvas 2D operations.
#[derive(Debug, Error)]
pub enum Canvas2dError {
    /// A width or height argument was zero, or a source has no area.
    #[error("Index size error: {0}")]
    IndexSize(String),

    /// Pixel read-back from a canvas tainted by cross-origin content.
    #[error("Security error: {0}")]
    Security(String),

    /// The object is not in a usable state (detached bitmap, malformed buffer).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Invalid surface dimensions (must be within limits).
    #[error("Invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Failed to parse CSS font string.
    #[error("Failed to parse font string: {0}")]
    FontParseError(String),

    /// Failed to parse color value.
    #[error("Failed to parse color: {0}")]
    ColorParseError(String),

    /// Failed to parse a filter list.
    #[error("Failed to parse filter: {0}")]
    FilterParseError(String),

    /// Invalid argument to a constructor.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngError(String),
}

impl Canvas2dError {
    /// True for the errors a script-facing binding reports as `IndexSizeError`.
    pub fn is_index_size(&self) -> bool {
        matches!(self, Canvas2dError::IndexSize(_))
    }

    /// True for `SecurityError`.
    pub fn is_security(&self) -> bool {
        matches!(self, Canvas2dError::Security(_))
    }

    /// True for `InvalidStateError`.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Canvas2dError::InvalidState(_))
    }
}

impl From<png::EncodingError> for Canvas2dError {
    fn from(err: png::EncodingError) -> Self {
        Canvas2dError::PngError(err.to_string())
    }
}
