//! Lanczos3 resampling with fast-image-resize
//!
//! Gray, RGB and RGBA buffers are resized in their own pixel layout so the
//! color mode survives. RGBA is resized with premultiplied alpha. Every other
//! layout goes through RGBA.

use fast_image_resize::{FilterType, Image, MulDiv, PixelType, ResizeAlg, Resizer};
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use std::num::NonZeroU32;

use super::error::ImageError;

/// Resize `img` to exactly `target_w` × `target_h`
pub fn resize_exact(
    img: &DynamicImage,
    target_w: u32,
    target_h: u32,
) -> Result<DynamicImage, ImageError> {
    let src_width =
        NonZeroU32::new(img.width()).ok_or_else(|| ImageError::resize_failed("Source width is 0"))?;
    let src_height = NonZeroU32::new(img.height())
        .ok_or_else(|| ImageError::resize_failed("Source height is 0"))?;
    let dst_width =
        NonZeroU32::new(target_w).ok_or_else(|| ImageError::resize_failed("Target width is 0"))?;
    let dst_height =
        NonZeroU32::new(target_h).ok_or_else(|| ImageError::resize_failed("Target height is 0"))?;

    let (pixels, pixel_type) = match img {
        DynamicImage::ImageLuma8(buf) => (buf.as_raw().clone(), PixelType::U8),
        DynamicImage::ImageRgb8(buf) => (buf.as_raw().clone(), PixelType::U8x3),
        other => (other.to_rgba8().into_raw(), PixelType::U8x4),
    };

    let mut src_image = Image::from_vec_u8(src_width, src_height, pixels, pixel_type)
        .map_err(|e| ImageError::resize_failed(format!("Failed to create source image: {:?}", e)))?;
    let mut dst_image = Image::new(dst_width, dst_height, pixel_type);

    let premultiply = pixel_type == PixelType::U8x4;
    let mul_div = MulDiv::default();
    if premultiply {
        mul_div
            .multiply_alpha_inplace(&mut src_image.view_mut())
            .map_err(|e| ImageError::resize_failed(format!("Alpha premultiply failed: {:?}", e)))?;
    }

    let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));
    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| ImageError::resize_failed(format!("Resize operation failed: {:?}", e)))?;

    if premultiply {
        mul_div
            .divide_alpha_inplace(&mut dst_image.view_mut())
            .map_err(|e| ImageError::resize_failed(format!("Alpha restore failed: {:?}", e)))?;
    }

    let result_buf = dst_image.into_vec();
    let missing_buffer = || ImageError::resize_failed("Failed to create output image buffer");
    let resized = match pixel_type {
        PixelType::U8 => DynamicImage::ImageLuma8(
            GrayImage::from_raw(target_w, target_h, result_buf).ok_or_else(missing_buffer)?,
        ),
        PixelType::U8x3 => DynamicImage::ImageRgb8(
            RgbImage::from_raw(target_w, target_h, result_buf).ok_or_else(missing_buffer)?,
        ),
        _ => DynamicImage::ImageRgba8(
            RgbaImage::from_raw(target_w, target_h, result_buf).ok_or_else(missing_buffer)?,
        ),
    };

    Ok(resized)
}
