//! Watermark processor: runs the diagonal tiled pipeline for one image.
//!
//! Stages, in order:
//!
//! 1. plan the canvas ([`GeometryPlan`]) and check it against the pixel limit
//! 2. resolve a font at the planned size
//! 3. draw the tiled text on the canvas
//! 4. rotate 45° and crop back to the image size
//! 5. blend onto the image
//!
//! The processor borrows the shared font library and owns nothing else, so
//! one instance can be built per request.

use std::time::Instant;

use image::{DynamicImage, RgbaImage};
use tracing::debug;

use super::compositor::composite;
use super::config::WatermarkConfig;
use super::geometry::GeometryPlan;
use super::pattern::{render_pattern, text_fill};
use super::rotate::rotate_and_crop;
use super::text_renderer::{resolve_font, FontLibrary, FontResolution, WatermarkFont};
use super::WatermarkError;
use crate::constants::{DEFAULT_MAX_WATERMARK_CANVAS_PIXELS, WATERMARK_ANGLE_DEGREES};

/// Applies diagonal tiled text watermarks using a shared font library.
#[derive(Debug, Clone, Copy)]
pub struct WatermarkProcessor<'a> {
    fonts: &'a FontLibrary,
    font_candidates: &'a [String],
    max_canvas_pixels: u64,
}

impl<'a> WatermarkProcessor<'a> {
    /// Create a processor that tries `font_candidates` in order.
    pub fn new(fonts: &'a FontLibrary, font_candidates: &'a [String]) -> Self {
        Self {
            fonts,
            font_candidates,
            max_canvas_pixels: DEFAULT_MAX_WATERMARK_CANVAS_PIXELS,
        }
    }

    pub fn with_max_canvas_pixels(mut self, max_canvas_pixels: u64) -> Self {
        self.max_canvas_pixels = max_canvas_pixels;
        self
    }

    /// Reject a plan whose working canvas exceeds the pixel limit.
    pub fn check_canvas(&self, plan: &GeometryPlan) -> Result<(), WatermarkError> {
        if plan.canvas_pixels() <= self.max_canvas_pixels {
            return Ok(());
        }
        Err(WatermarkError::ConfigError(format!(
            "Image {}x{} needs a {}x{} watermark canvas, over the limit of {} pixels",
            plan.width, plan.height, plan.canvas_width, plan.canvas_height, self.max_canvas_pixels
        )))
    }

    /// Resolve the font for `plan`, logging every candidate that failed.
    pub fn resolve_font(&self, plan: &GeometryPlan) -> FontResolution {
        resolve_font(self.font_candidates, plan.font_size, self.fonts)
    }

    /// Watermark `image` and return a new RGBA buffer of the same size.
    ///
    /// The configuration and the canvas size are validated first; nothing is
    /// allocated or drawn when either is rejected.
    pub fn apply(
        &self,
        image: &DynamicImage,
        config: &WatermarkConfig,
    ) -> Result<RgbaImage, WatermarkError> {
        config.validate()?;

        let plan = GeometryPlan::plan(image.width(), image.height(), config.font_size)?;
        self.check_canvas(&plan)?;
        let resolution = self.resolve_font(&plan);
        if resolution.used_fallback() && !self.font_candidates.is_empty() {
            debug!(
                failures = resolution.failures.len(),
                requested_size = plan.font_size,
                "Watermark drawn with the built-in bitmap font"
            );
        }

        apply_with_font(image, config, &plan, &resolution.font)
    }
}

/// Run stages 3 to 5 with an already resolved font.
pub fn apply_with_font(
    image: &DynamicImage,
    config: &WatermarkConfig,
    plan: &GeometryPlan,
    font: &WatermarkFont,
) -> Result<RgbaImage, WatermarkError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(WatermarkError::CompositeError(
            "image has no pixels".to_string(),
        ));
    }

    let started = Instant::now();
    let canvas = render_pattern(
        &config.text,
        font,
        plan.canvas_size(),
        config.density,
        text_fill(config.fill_alpha()),
    )?;
    let rendered = started.elapsed();

    let overlay = rotate_and_crop(&canvas, plan, WATERMARK_ANGLE_DEGREES)?;
    drop(canvas);
    let rotated = started.elapsed();

    let result = composite(image, &overlay)?;

    debug!(
        width = plan.width,
        height = plan.height,
        canvas = plan.canvas_width,
        font_size = plan.font_size,
        render_ms = rendered.as_millis() as u64,
        rotate_ms = (rotated - rendered).as_millis() as u64,
        composite_ms = (started.elapsed() - rotated).as_millis() as u64,
        "Applied diagonal watermark"
    );

    Ok(result)
}
