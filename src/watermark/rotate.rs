//! Rotates the pattern canvas and cuts out the image-sized window.

use image::imageops;
use image::RgbaImage;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

use super::geometry::{CropWindow, GeometryPlan};
use super::pattern::TRANSPARENT_WHITE;
use super::WatermarkError;

/// Rotate `canvas` about its center by `degrees`, counter-clockwise as
/// displayed. Size is unchanged; uncovered pixels are transparent.
pub fn rotate_canvas(canvas: &RgbaImage, degrees: f32) -> RgbaImage {
    // imageproc turns clockwise for positive angles (y axis points down)
    let theta = -degrees.to_radians();
    rotate_about_center(canvas, theta, Interpolation::Bicubic, TRANSPARENT_WHITE)
}

/// Copy `window` out of `canvas`.
pub fn crop_window(canvas: &RgbaImage, window: CropWindow) -> Result<RgbaImage, WatermarkError> {
    if window.width == 0
        || window.height == 0
        || window.right() > canvas.width()
        || window.bottom() > canvas.height()
    {
        return Err(WatermarkError::CompositeError(format!(
            "crop window {}x{} at ({}, {}) does not fit a {}x{} canvas",
            window.width,
            window.height,
            window.left,
            window.top,
            canvas.width(),
            canvas.height()
        )));
    }

    Ok(imageops::crop_imm(canvas, window.left, window.top, window.width, window.height).to_image())
}

/// Rotate by `degrees` and crop to the plan's window, giving an overlay the
/// size of the base image.
pub fn rotate_and_crop(
    canvas: &RgbaImage,
    plan: &GeometryPlan,
    degrees: f32,
) -> Result<RgbaImage, WatermarkError> {
    if canvas.dimensions() != plan.canvas_size() {
        return Err(WatermarkError::CompositeError(format!(
            "canvas is {}x{}, plan expects {}x{}",
            canvas.width(),
            canvas.height(),
            plan.canvas_width,
            plan.canvas_height
        )));
    }

    let rotated = rotate_canvas(canvas, degrees);
    crop_window(&rotated, plan.crop_window())
}
