//! Codec module
//!
//! Thin wrappers around the image libraries:
//! - Decoding with input-size and image-bomb guards
//! - A closed [`OutputFormat`] enumeration with per-format capabilities
//! - One encoder per output format (JPEG, PNG, WebP, AVIF)
//! - Lanczos3 resampling

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod format;
pub mod resize;
pub mod security;

// Re-export commonly used types
pub use decoder::{decode, format_name, png_chunks, DecodedImage, PngChunks};
pub use encoder::{
    encode, EncodedImage, EncoderFactory, EncoderSettings, ImageEncoder, Quality,
};
pub use error::ImageError;
pub use format::{flatten_onto_white, ColorMode, OutputFormat};
pub use resize::resize_exact;
pub use security::{validate_dimensions, validate_file_size, SecurityConfig};
