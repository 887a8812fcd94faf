//! Error type returned by every operation.
//!
//! Lower-level errors convert into [`ServiceError`] through `From`, so
//! operations propagate them with `?`. Each error belongs to one
//! [`ErrorCategory`] and maps to an HTTP-style status code for callers that
//! expose the operations over a transport.

use serde::Serialize;
use thiserror::Error;

use crate::codec::ImageError;
use crate::watermark::WatermarkError;

/// Coarse classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Caller-supplied parameters are out of range or malformed
    Validation,
    /// Input bytes are not a decodable image
    Decode,
    /// No usable font could be produced
    FontLoad,
    /// The encoder rejected the image
    Encode,
    /// Anything else
    Internal,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Decode => "decode",
            ErrorCategory::FontLoad => "font_load",
            ErrorCategory::Encode => "encode",
            ErrorCategory::Internal => "internal",
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ServiceError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to load font: {0}")]
    FontLoad(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Codec(#[from] ImageError),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ServiceError::Validation(_) => ErrorCategory::Validation,
            ServiceError::Decode(_) => ErrorCategory::Decode,
            ServiceError::FontLoad(_) => ErrorCategory::FontLoad,
            ServiceError::Encode(_) => ErrorCategory::Encode,
            ServiceError::Internal(_) => ErrorCategory::Internal,
            ServiceError::Codec(err) => match err {
                ImageError::InvalidParameter { .. } => ErrorCategory::Validation,
                ImageError::UnsupportedFormat { .. }
                | ImageError::DecodeFailed { .. }
                | ImageError::ImageBombDetected { .. }
                | ImageError::FileTooLarge { .. } => ErrorCategory::Decode,
                ImageError::EncodeFailed { .. } => ErrorCategory::Encode,
                ImageError::ResizeFailed { .. } => ErrorCategory::Internal,
            },
        }
    }

    /// Maps to HTTP status codes
    ///
    /// - Validation, Decode → 400 (415 unsupported input, 413 oversized input)
    /// - FontLoad, Encode, Internal → 500
    pub fn to_http_status(&self) -> u16 {
        match self {
            ServiceError::Codec(err) => err.to_http_status(),
            other => match other.category() {
                ErrorCategory::Validation | ErrorCategory::Decode => 400,
                ErrorCategory::FontLoad | ErrorCategory::Encode | ErrorCategory::Internal => 500,
            },
        }
    }

    pub fn is_validation(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }
}

impl From<WatermarkError> for ServiceError {
    fn from(err: WatermarkError) -> Self {
        match err {
            WatermarkError::ConfigError(msg) => ServiceError::Validation(msg),
            WatermarkError::FontLoadError(msg) => ServiceError::FontLoad(msg),
            WatermarkError::RenderError(msg) | WatermarkError::CompositeError(msg) => {
                ServiceError::Internal(msg)
            }
        }
    }
}
