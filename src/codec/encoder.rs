//! Per-format encoders.
//!
//! [`EncoderFactory`] hands out one [`ImageEncoder`] per [`OutputFormat`].
//! All of them take the same [`Quality`]; PNG ignores it and AVIF reads its
//! speed from [`EncoderSettings`].

use image::{ColorType, DynamicImage, ImageEncoder as _, ImageOutputFormat};
use imgref::Img;
use rgb::FromSlice;
use std::io::Cursor;

use super::error::ImageError;
use super::format::{flatten_onto_white, OutputFormat};
use crate::constants::{DEFAULT_AVIF_SPEED, DEFAULT_PNG_OPTIMIZATION_LEVEL, DEFAULT_QUALITY};

/// Lossy quality, always within 1..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Quality(value.clamp(1, 100))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    fn as_f32(self) -> f32 {
        f32::from(self.0)
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality::new(DEFAULT_QUALITY)
    }
}

/// Per-format encoder tuning, usually taken from the `image` config section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderSettings {
    /// Run lossless oxipng optimisation on PNG output
    pub optimize_png: bool,
    /// oxipng preset (0-6)
    pub png_level: u8,
    /// AVIF speed (1 = slowest/best, 10 = fastest)
    pub avif_speed: u8,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            optimize_png: true,
            png_level: DEFAULT_PNG_OPTIMIZATION_LEVEL,
            avif_speed: DEFAULT_AVIF_SPEED,
        }
    }
}

#[derive(Debug)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub format: OutputFormat,
    /// MIME type of `data`
    pub content_type: &'static str,
}

impl EncodedImage {
    pub fn new(data: Vec<u8>, format: OutputFormat) -> Self {
        Self {
            content_type: format.content_type(),
            data,
            format,
        }
    }
}

/// Turns a decoded buffer into the bytes of one output format.
///
/// The input is borrowed and left untouched; alpha flattening and bit depth
/// conversion happen on copies.
pub trait ImageEncoder: Send + Sync {
    fn format(&self) -> OutputFormat;

    fn encode(&self, image: &DynamicImage, quality: Quality) -> Result<EncodedImage, ImageError>;

    fn supports_transparency(&self) -> bool {
        self.format().supports_alpha()
    }
}

fn failed(format: OutputFormat, err: impl std::fmt::Display) -> ImageError {
    ImageError::encode_failed(format.as_str(), err.to_string())
}

/// Baseline JPEG; alpha is composited onto white and gray stays single-channel.
pub struct JpegEncoder;

impl ImageEncoder for JpegEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Jpeg
    }

    fn encode(&self, image: &DynamicImage, quality: Quality) -> Result<EncodedImage, ImageError> {
        let opaque = flatten_onto_white(image);
        let (pixels, color) = if opaque.color().has_color() {
            (opaque.to_rgb8().into_raw(), ColorType::Rgb8)
        } else {
            (opaque.to_luma8().into_raw(), ColorType::L8)
        };

        let mut buffer = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality.get())
            .write_image(&pixels, opaque.width(), opaque.height(), color)
            .map_err(|e| failed(OutputFormat::Jpeg, e))?;

        Ok(EncodedImage::new(buffer, OutputFormat::Jpeg))
    }
}

/// Lossless PNG in the source color type, optionally squeezed by oxipng.
pub struct PngEncoder {
    /// oxipng preset, `None` writes the plain encoder output
    pub optimization_level: Option<u8>,
}

impl Default for PngEncoder {
    fn default() -> Self {
        PngEncoder {
            optimization_level: Some(DEFAULT_PNG_OPTIMIZATION_LEVEL),
        }
    }
}

impl ImageEncoder for PngEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Png
    }

    fn encode(&self, image: &DynamicImage, _: Quality) -> Result<EncodedImage, ImageError> {
        // PNG has no float samples
        let converted;
        let source = match image {
            DynamicImage::ImageRgb32F(_) => {
                converted = DynamicImage::ImageRgb8(image.to_rgb8());
                &converted
            }
            DynamicImage::ImageRgba32F(_) => {
                converted = DynamicImage::ImageRgba8(image.to_rgba8());
                &converted
            }
            other => other,
        };

        let mut cursor = Cursor::new(Vec::new());
        source
            .write_to(&mut cursor, ImageOutputFormat::Png)
            .map_err(|e| failed(OutputFormat::Png, e))?;

        let data = match self.optimization_level {
            Some(level) => optimize_png(cursor.get_ref(), level)?,
            None => cursor.into_inner(),
        };
        Ok(EncodedImage::new(data, OutputFormat::Png))
    }
}

/// Lossless recompression that keeps the color type and bit depth intact
fn optimize_png(data: &[u8], level: u8) -> Result<Vec<u8>, ImageError> {
    let mut options = oxipng::Options::from_preset(level.min(6));
    options.bit_depth_reduction = false;
    options.color_type_reduction = false;
    options.palette_reduction = false;
    options.grayscale_reduction = false;

    oxipng::optimize_from_memory(data, &options).map_err(|e| failed(OutputFormat::Png, e))
}

/// Lossy WebP through libwebp; keeps alpha when the source has it.
pub struct WebPEncoder;

impl ImageEncoder for WebPEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::WebP
    }

    fn encode(&self, image: &DynamicImage, quality: Quality) -> Result<EncodedImage, ImageError> {
        let (width, height) = (image.width(), image.height());
        let pixels;
        let encoder = if image.color().has_alpha() {
            pixels = image.to_rgba8().into_raw();
            webp::Encoder::from_rgba(&pixels, width, height)
        } else {
            pixels = image.to_rgb8().into_raw();
            webp::Encoder::from_rgb(&pixels, width, height)
        };

        let memory = encoder
            .encode_simple(false, quality.as_f32())
            .map_err(|e| failed(OutputFormat::WebP, format!("{:?}", e)))?;
        Ok(EncodedImage::new(memory.to_vec(), OutputFormat::WebP))
    }
}

/// AV1 still image through ravif.
pub struct AvifEncoder {
    /// 1 is slowest with the best compression, 10 is fastest
    pub speed: u8,
}

impl Default for AvifEncoder {
    fn default() -> Self {
        AvifEncoder {
            speed: DEFAULT_AVIF_SPEED,
        }
    }
}

impl ImageEncoder for AvifEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Avif
    }

    fn encode(&self, image: &DynamicImage, quality: Quality) -> Result<EncodedImage, ImageError> {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let av1 = ravif::Encoder::new()
            .with_quality(quality.as_f32())
            .with_alpha_quality(quality.as_f32())
            .with_speed(self.speed.clamp(1, 10));

        let result = if image.color().has_alpha() {
            let rgba = image.to_rgba8();
            av1.encode_rgba(Img::new(rgba.as_raw().as_rgba(), width, height))
        } else {
            let rgb = image.to_rgb8();
            av1.encode_rgb(Img::new(rgb.as_raw().as_rgb(), width, height))
        };
        let encoded = result.map_err(|e| failed(OutputFormat::Avif, e))?;

        Ok(EncodedImage::new(encoded.avif_file, OutputFormat::Avif))
    }
}

/// Picks the encoder for an [`OutputFormat`].
pub struct EncoderFactory;

impl EncoderFactory {
    pub fn create(format: OutputFormat) -> Box<dyn ImageEncoder> {
        Self::create_with(format, &EncoderSettings::default())
    }

    pub fn create_with(format: OutputFormat, settings: &EncoderSettings) -> Box<dyn ImageEncoder> {
        match format {
            OutputFormat::Jpeg => Box::new(JpegEncoder),
            OutputFormat::Png => Box::new(PngEncoder {
                optimization_level: settings.optimize_png.then_some(settings.png_level),
            }),
            OutputFormat::WebP => Box::new(WebPEncoder),
            OutputFormat::Avif => Box::new(AvifEncoder {
                speed: settings.avif_speed,
            }),
        }
    }
}

/// Encode `image` to `format`; `quality` is clamped to 1..=100.
pub fn encode(
    image: &DynamicImage,
    format: OutputFormat,
    quality: u8,
    settings: &EncoderSettings,
) -> Result<EncodedImage, ImageError> {
    let encoded = EncoderFactory::create_with(format, settings).encode(image, Quality::new(quality))?;

    tracing::debug!(
        format = %format,
        quality,
        bytes = encoded.data.len(),
        "Encoded image"
    );

    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decoder::decode;
    use crate::codec::format::ColorMode;
    use crate::codec::security::SecurityConfig;
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
    use rstest::rstest;

    const PNG_MAGIC: [u8; 4] = [0x89, b'P', b'N', b'G'];

    fn gradient() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(16, 12, |x, y| {
            Rgb([(x * 15) as u8, (y * 20) as u8, 90])
        }))
    }

    fn half_transparent() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(16, 12, |x, y| {
            Rgba([200, (x * 10) as u8, (y * 10) as u8, if x < 8 { 255 } else { 64 }])
        }))
    }

    fn gray(width: u32, height: u32, level: u8) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([level])))
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(72, 72)]
    #[case(100, 100)]
    #[case(255, 100)]
    fn test_quality_stays_in_range(#[case] input: u8, #[case] expected: u8) {
        assert_eq!(Quality::new(input).get(), expected);
    }

    #[test]
    fn test_default_quality() {
        assert_eq!(Quality::default().get(), DEFAULT_QUALITY);
    }

    #[test]
    fn test_factory_covers_every_format() {
        for format in OutputFormat::ALL {
            let encoder = EncoderFactory::create(format);
            assert_eq!(encoder.format(), format);
            assert_eq!(encoder.supports_transparency(), format.supports_alpha());
        }
    }

    #[test]
    fn test_unoptimised_png_is_still_png() {
        let settings = EncoderSettings {
            optimize_png: false,
            ..Default::default()
        };
        let encoded = EncoderFactory::create_with(OutputFormat::Png, &settings)
            .encode(&gradient(), Quality::default())
            .unwrap();
        assert!(encoded.data.starts_with(&PNG_MAGIC));
    }

    #[rstest]
    #[case(OutputFormat::Jpeg, "image/jpeg")]
    #[case(OutputFormat::Png, "image/png")]
    #[case(OutputFormat::WebP, "image/webp")]
    fn test_encoded_image_carries_mime_type(#[case] format: OutputFormat, #[case] mime: &str) {
        let encoded = encode(&half_transparent(), format, 80, &EncoderSettings::default()).unwrap();
        assert_eq!(encoded.format, format);
        assert_eq!(encoded.content_type, mime);
    }

    #[test]
    fn test_container_signatures() {
        let jpeg = JpegEncoder.encode(&half_transparent(), Quality::default()).unwrap();
        assert!(jpeg.data.starts_with(&[0xFF, 0xD8]));

        let png = PngEncoder::default()
            .encode(&half_transparent(), Quality::default())
            .unwrap();
        assert!(png.data.starts_with(&PNG_MAGIC));

        let webp = WebPEncoder.encode(&gradient(), Quality::default()).unwrap();
        assert_eq!((&webp.data[..4], &webp.data[8..12]), (&b"RIFF"[..], &b"WEBP"[..]));

        let avif = AvifEncoder { speed: 10 }
            .encode(&gradient(), Quality::new(60))
            .unwrap();
        // ISO-BMFF ftyp box, avif brand
        assert_eq!(&avif.data[4..12], b"ftypavif");
    }

    #[test]
    fn test_png_preserves_mode_and_pixels() {
        let limits = SecurityConfig::default();
        for image in [gradient(), half_transparent(), gray(5, 7, 77)] {
            let encoded = encode(&image, OutputFormat::Png, 85, &EncoderSettings::default())
                .unwrap();
            let decoded = decode(&encoded.data, &limits).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (image.width(), image.height()));
            assert_eq!(decoded.mode, ColorMode::of(&image));
            assert_eq!(decoded.image.as_bytes(), image.as_bytes());
        }
    }

    #[test]
    fn test_jpeg_keeps_gray_single_channel() {
        let limits = SecurityConfig::default();
        for image in [gradient(), gray(9, 9, 30)] {
            let encoded =
                encode(&image, OutputFormat::Jpeg, 85, &EncoderSettings::default()).unwrap();
            let decoded = decode(&encoded.data, &limits).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (image.width(), image.height()));
            assert_eq!(decoded.mode, ColorMode::of(&image));
        }
    }

    #[test]
    fn test_webp_without_alpha_decodes_as_rgb() {
        let limits = SecurityConfig::default();
        let encoded =
            encode(&gradient(), OutputFormat::WebP, 85, &EncoderSettings::default()).unwrap();
        let decoded = decode(&encoded.data, &limits).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 12));
        assert_eq!(decoded.mode, ColorMode::Rgb);
    }

    #[test]
    fn test_source_buffer_is_untouched() {
        let image = half_transparent();
        let before = image.as_bytes().to_vec();
        JpegEncoder.encode(&image, Quality::default()).unwrap();
        assert_eq!(image.as_bytes(), &before[..]);
    }
}
