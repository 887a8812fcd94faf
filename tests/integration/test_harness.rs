// Shared fixtures for the integration tests

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

use imagepress::config::Config;
use imagepress::context::ServiceContext;

/// Context with defaults, without scanning system fonts
pub fn test_context() -> ServiceContext {
    let mut config = Config::default();
    config.watermark.load_system_fonts = false;
    config.image.optimize_png = false;
    ServiceContext::new(config)
}

/// Context that searches the installed system fonts
pub fn system_font_context() -> ServiceContext {
    let mut config = Config::default();
    config.image.optimize_png = false;
    ServiceContext::new(config)
}

pub fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

/// Smooth RGB gradient, the kind of content a photo has
pub fn create_test_photo(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
        ])
    }))
}

/// PNG with a transparent left half
pub fn create_test_png_with_alpha(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        let alpha = if x < width / 2 { 0 } else { 255 };
        Rgba([0, 128, 255, alpha])
    });
    encode(&DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

pub fn decode(data: &[u8]) -> DynamicImage {
    image::load_from_memory(data).unwrap()
}
