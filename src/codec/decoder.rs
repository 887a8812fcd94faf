//! Image decoding
//!
//! Turns raw bytes into an owned [`DecodedImage`], enforcing the input
//! limits from [`SecurityConfig`] before any pixel data is decompressed.

use image::io::Reader as ImageReader;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

use super::error::ImageError;
use super::format::ColorMode;
use super::security::{validate_dimensions, validate_file_size, SecurityConfig};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const PNG_COLOR_TYPE_PALETTE: u8 = 3;

/// A decoded image buffer owned by a single request
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Pixel data
    pub image: DynamicImage,
    /// Detected container format
    pub format: ImageFormat,
    /// Color mode of the source (palette images report `Palette`)
    pub mode: ColorMode,
    /// Size of the encoded input in bytes
    pub byte_len: usize,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Upper-case format name ("PNG", "JPEG", ...)
    pub fn format_name(&self) -> String {
        format_name(self.format)
    }
}

/// Upper-case display name for a container format
pub fn format_name(format: ImageFormat) -> String {
    format!("{:?}", format).to_uppercase()
}

/// Decode image bytes into a [`DecodedImage`]
pub fn decode(data: &[u8], limits: &SecurityConfig) -> Result<DecodedImage, ImageError> {
    validate_file_size(data.len(), limits)?;

    let format = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageError::decode_failed(e.to_string()))?
        .format()
        .ok_or_else(|| ImageError::decode_failed("cannot identify image file"))?;

    let (width, height) = ImageReader::with_format(Cursor::new(data), format)
        .into_dimensions()
        .map_err(map_image_error)?;
    validate_dimensions(width, height, limits)?;

    let image = ImageReader::with_format(Cursor::new(data), format)
        .decode()
        .map_err(map_image_error)?;

    let mode = if format == ImageFormat::Png {
        png_palette_mode(data).unwrap_or_else(|| ColorMode::of(&image))
    } else {
        ColorMode::of(&image)
    };

    tracing::debug!(
        format = ?format,
        width,
        height,
        mode = mode.label(),
        bytes = data.len(),
        "Decoded image"
    );

    Ok(DecodedImage {
        image,
        format,
        mode,
        byte_len: data.len(),
    })
}

fn map_image_error(err: image::ImageError) -> ImageError {
    match err {
        image::ImageError::Unsupported(e) => ImageError::unsupported_format(e.to_string()),
        other => ImageError::decode_failed(other.to_string()),
    }
}

/// Detect indexed-color PNGs from the IHDR chunk. Returns `None` for
/// non-palette images.
fn png_palette_mode(data: &[u8]) -> Option<ColorMode> {
    if data.len() < 33 || data[..8] != PNG_SIGNATURE || &data[12..16] != b"IHDR" {
        return None;
    }
    if data[25] != PNG_COLOR_TYPE_PALETTE {
        return None;
    }

    // tRNS must come before the first IDAT
    let transparent = png_chunks(data)
        .take_while(|(kind, _)| kind != b"IDAT" && kind != b"IEND")
        .any(|(kind, _)| &kind == b"tRNS");

    Some(ColorMode::Palette { transparent })
}

/// Iterate over the `(type, body)` chunks of a PNG stream. Stops at the
/// first truncated chunk. Yields nothing for non-PNG data.
pub fn png_chunks(data: &[u8]) -> PngChunks<'_> {
    let offset = if data.starts_with(&PNG_SIGNATURE) {
        PNG_SIGNATURE.len()
    } else {
        data.len()
    };
    PngChunks { data, offset }
}

pub struct PngChunks<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Iterator for PngChunks<'a> {
    type Item = ([u8; 4], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let header = self.data.get(self.offset..self.offset.checked_add(8)?)?;
        let len = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let kind = [header[4], header[5], header[6], header[7]];

        let body_start = self.offset + 8;
        let body_end = body_start.checked_add(len)?;
        let body = self.data.get(body_start..body_end)?;

        // Skip body and CRC
        self.offset = body_end.saturating_add(4);
        Some((kind, body))
    }
}
