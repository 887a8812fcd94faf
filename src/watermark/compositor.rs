//! Watermark compositor for blending the overlay onto the base image.
//!
//! Uses the Porter-Duff "over" operator per pixel. Overlay pixels with zero
//! alpha leave the base pixel untouched, so an opacity of 0 reproduces the
//! input exactly.

use image::{DynamicImage, Rgba, RgbaImage};

use super::WatermarkError;
use crate::codec::flatten_onto_white;

/// Blend `overlay` over `base`. Both must have the same dimensions.
///
/// The base is converted to RGBA (opaque when it has no alpha channel);
/// neither input is modified.
pub fn composite(base: &DynamicImage, overlay: &RgbaImage) -> Result<RgbaImage, WatermarkError> {
    if base.width() != overlay.width() || base.height() != overlay.height() {
        return Err(WatermarkError::CompositeError(format!(
            "overlay is {}x{}, image is {}x{}",
            overlay.width(),
            overlay.height(),
            base.width(),
            base.height()
        )));
    }

    let mut result = base.to_rgba8();
    for (target, top) in result.pixels_mut().zip(overlay.pixels()) {
        if top[3] == 0 {
            continue;
        }
        *target = blend_pixels(*target, *top);
    }

    Ok(result)
}

/// Turn the composited buffer into the image handed to the encoder.
///
/// Formats without alpha get every pixel flattened onto opaque white.
pub fn finalize(composited: RgbaImage, keep_alpha: bool) -> DynamicImage {
    let image = DynamicImage::ImageRgba8(composited);
    if keep_alpha {
        image
    } else {
        flatten_onto_white(&image)
    }
}

/// Blend two pixels using the "over" operator:
/// `out_a = a_o + a_b(1 − a_o)`, `out_c = (c_o·a_o + c_b·a_b(1 − a_o)) / out_a`.
fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    let fg_alpha = foreground[3] as f32 / 255.0;
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);
    if out_alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let result = (fg as f32 * fg_alpha + bg as f32 * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        result.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}
