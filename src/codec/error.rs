//! Codec errors.
//!
//! Every failure of the decode, resample and encode stages, with the status
//! code a transport would answer with.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// Recognised container the decoder cannot read (AVIF input, for one)
    #[error("Unsupported image format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Failed to decode image: {message}")]
    DecodeFailed { message: String },

    /// Input is larger than [`SecurityConfig`](super::SecurityConfig) allows
    #[error("Image dimensions {width}x{height} ({pixels} pixels) exceed limit of {max_pixels} pixels")]
    ImageBombDetected {
        width: u32,
        height: u32,
        pixels: u64,
        max_pixels: u64,
    },

    #[error("File size {size} bytes exceeds maximum {max_size} bytes")]
    FileTooLarge { size: usize, max_size: usize },

    #[error("Resampling failed: {message}")]
    ResizeFailed { message: String },

    #[error("Failed to encode to {format}: {message}")]
    EncodeFailed { format: String, message: String },

    #[error("Invalid parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },
}

impl ImageError {
    /// 415 unsupported input, 413 oversized file, 400 other input or
    /// parameter problems, 500 resample and encode failures.
    pub fn to_http_status(&self) -> u16 {
        match self {
            Self::UnsupportedFormat { .. } => 415,
            Self::FileTooLarge { .. } => 413,
            Self::DecodeFailed { .. }
            | Self::ImageBombDetected { .. }
            | Self::InvalidParameter { .. } => 400,
            Self::ResizeFailed { .. } | Self::EncodeFailed { .. } => 500,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }

    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn decode_failed(message: impl Into<String>) -> Self {
        Self::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn resize_failed(message: impl Into<String>) -> Self {
        Self::ResizeFailed {
            message: message.into(),
        }
    }

    pub fn encode_failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EncodeFailed {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn invalid_param(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    pub fn image_bomb(width: u32, height: u32, max_pixels: u64) -> Self {
        Self::ImageBombDetected {
            width,
            height,
            pixels: u64::from(width) * u64::from(height),
            max_pixels,
        }
    }
}
