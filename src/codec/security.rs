//! Limits on what the decoder accepts: encoded size, width, height and
//! total pixel count. A small file can declare enormous dimensions, so the
//! dimension check runs on the header alone.

use serde::{Deserialize, Serialize};

use super::error::ImageError;
use crate::constants::{
    DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_SOURCE_HEIGHT, DEFAULT_MAX_SOURCE_PIXELS,
    DEFAULT_MAX_SOURCE_WIDTH,
};

/// `image.security` section of the configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(default = "default_max_source_width")]
    pub max_source_width: u32,
    #[serde(default = "default_max_source_height")]
    pub max_source_height: u32,
    /// width × height
    #[serde(default = "default_max_source_pixels")]
    pub max_source_pixels: u64,
    /// Encoded bytes
    #[serde(default = "default_max_source_file_size")]
    pub max_source_file_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_source_width: DEFAULT_MAX_SOURCE_WIDTH,
            max_source_height: DEFAULT_MAX_SOURCE_HEIGHT,
            max_source_pixels: DEFAULT_MAX_SOURCE_PIXELS,
            max_source_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

fn default_max_source_width() -> u32 {
    DEFAULT_MAX_SOURCE_WIDTH
}

fn default_max_source_height() -> u32 {
    DEFAULT_MAX_SOURCE_HEIGHT
}

fn default_max_source_pixels() -> u64 {
    DEFAULT_MAX_SOURCE_PIXELS
}

fn default_max_source_file_size() -> usize {
    DEFAULT_MAX_FILE_SIZE
}

/// Reject a `width` × `height` image exceeding any limit.
///
/// Decoders call this with the header dimensions, before pixel data is
/// decompressed. Resize checks its target size the same way.
pub fn validate_dimensions(
    width: u32,
    height: u32,
    limits: &SecurityConfig,
) -> Result<(), ImageError> {
    let too_wide = width > limits.max_source_width;
    let too_tall = height > limits.max_source_height;
    let too_many = u64::from(width) * u64::from(height) > limits.max_source_pixels;

    if too_wide || too_tall || too_many {
        return Err(ImageError::image_bomb(width, height, limits.max_source_pixels));
    }
    Ok(())
}

/// Reject inputs of more than `max_source_file_size` bytes.
pub fn validate_file_size(size: usize, limits: &SecurityConfig) -> Result<(), ImageError> {
    if size <= limits.max_source_file_size {
        return Ok(());
    }
    Err(ImageError::FileTooLarge {
        size,
        max_size: limits.max_source_file_size,
    })
}
