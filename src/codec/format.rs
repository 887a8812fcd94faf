//! Output formats and color modes
//!
//! Every supported output format is a variant of [`OutputFormat`], and each
//! variant carries its own capabilities (alpha support, MIME type, file
//! extension). Callers branch on the enum, never on format strings.

use std::fmt;
use std::str::FromStr;

use image::{DynamicImage, Rgb, RgbImage};
use serde::Serialize;

use super::error::ImageError;

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Avif,
    WebP,
    Png,
    Jpeg,
}

impl OutputFormat {
    /// All formats in the order the info report lists them
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Avif,
        OutputFormat::WebP,
        OutputFormat::Png,
        OutputFormat::Jpeg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Avif => "avif",
            Self::WebP => "webp",
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Avif => "image/avif",
            Self::WebP => "image/webp",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Avif => "avif",
            Self::WebP => "webp",
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// Whether the format can carry an alpha channel
    pub fn supports_alpha(&self) -> bool {
        !matches!(self, Self::Jpeg)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "avif" => Ok(OutputFormat::Avif),
            "webp" => Ok(OutputFormat::WebP),
            "png" => Ok(OutputFormat::Png),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            _ => Err(ImageError::invalid_param(
                "format",
                format!(
                    "Format must be one of [\"avif\", \"webp\", \"png\", \"jpg\", \"jpeg\"], got '{}'",
                    s
                ),
            )),
        }
    }
}

/// Color mode of an image buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    Grayscale,
    GrayscaleAlpha,
    Rgb,
    Rgba,
    /// Indexed color; `transparent` is set when the palette carries a tRNS chunk
    Palette { transparent: bool },
}

impl ColorMode {
    /// Color mode of a decoded buffer
    pub fn of(image: &DynamicImage) -> Self {
        let color = image.color();
        match (color.has_color(), color.has_alpha()) {
            (false, false) => ColorMode::Grayscale,
            (false, true) => ColorMode::GrayscaleAlpha,
            (true, false) => ColorMode::Rgb,
            (true, true) => ColorMode::Rgba,
        }
    }

    pub fn has_alpha(&self) -> bool {
        match self {
            ColorMode::GrayscaleAlpha | ColorMode::Rgba => true,
            ColorMode::Palette { transparent } => *transparent,
            ColorMode::Grayscale | ColorMode::Rgb => false,
        }
    }

    /// Short mode label ("L", "LA", "RGB", "RGBA", "P")
    pub fn label(&self) -> &'static str {
        match self {
            ColorMode::Grayscale => "L",
            ColorMode::GrayscaleAlpha => "LA",
            ColorMode::Rgb => "RGB",
            ColorMode::Rgba => "RGBA",
            ColorMode::Palette { .. } => "P",
        }
    }
}

/// Blend every pixel onto opaque white using its alpha, dropping the alpha
/// channel. Images without alpha are returned unchanged.
pub fn flatten_onto_white(image: &DynamicImage) -> DynamicImage {
    if !image.color().has_alpha() {
        return image.clone();
    }

    let rgba = image.to_rgba8();
    let flattened = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let px = rgba.get_pixel(x, y);
        let alpha = px[3] as f32 / 255.0;
        let over_white = |c: u8| -> u8 {
            (c as f32 * alpha + 255.0 * (1.0 - alpha))
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Rgb([over_white(px[0]), over_white(px[1]), over_white(px[2])])
    });

    if image.color().has_color() {
        DynamicImage::ImageRgb8(flattened)
    } else {
        DynamicImage::ImageLuma8(DynamicImage::ImageRgb8(flattened).to_luma8())
    }
}
