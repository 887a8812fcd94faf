//! Canvas geometry for diagonal watermarks.
//!
//! The tiled text is drawn on a square canvas twice the image diagonal on a
//! side. The canvas center stays covered by text after any rotation, so the
//! image-sized window cropped around it never shows undrawn corners.

use super::WatermarkError;
use crate::constants::AUTO_FONT_SIZE_DIVISOR;

/// Canvas size, font size and crop window derived from the base image size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryPlan {
    /// Base image width
    pub width: u32,
    /// Base image height
    pub height: u32,
    /// ceil(sqrt(width² + height²))
    pub diagonal: u32,
    /// Canvas width (2 · diagonal)
    pub canvas_width: u32,
    /// Canvas height (2 · diagonal)
    pub canvas_height: u32,
    /// Font size in pixels
    pub font_size: u32,
}

/// Region of the canvas that lines up with the base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl CropWindow {
    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }
}

impl GeometryPlan {
    /// Plan the canvas for a `width` × `height` image.
    ///
    /// An explicit font size wins when it is positive; otherwise the font is
    /// `max(width, height) / 20`, never below 1. Fails when the canvas side
    /// does not fit in a `u32`.
    pub fn plan(width: u32, height: u32, font_size: Option<u32>) -> Result<Self, WatermarkError> {
        let side = diagonal_of(width, height)
            .checked_mul(2)
            .and_then(|side| u32::try_from(side).ok())
            .ok_or_else(|| {
                WatermarkError::ConfigError(format!(
                    "Image {}x{} is too large to watermark",
                    width, height
                ))
            })?;
        let diagonal = side / 2;
        let font_size = match font_size {
            Some(size) if size > 0 => size,
            _ => (width.max(height) / AUTO_FONT_SIZE_DIVISOR).max(1),
        };

        Ok(Self {
            width,
            height,
            diagonal,
            canvas_width: side,
            canvas_height: side,
            font_size,
        })
    }

    /// Window `[diagonal − W/2, diagonal − H/2, diagonal + W/2, diagonal + H/2]`
    /// with integer halves, exactly `width` × `height` in size.
    pub fn crop_window(&self) -> CropWindow {
        CropWindow {
            left: self.diagonal - self.width / 2,
            top: self.diagonal - self.height / 2,
            width: self.width,
            height: self.height,
        }
    }

    /// (width, height) of the working canvas
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    /// Pixel count of the working canvas
    pub fn canvas_pixels(&self) -> u64 {
        u64::from(self.canvas_width) * u64::from(self.canvas_height)
    }
}

/// ceil(sqrt(w² + h²)), computed exactly in integers.
///
/// The sum of squares needs up to 65 bits, so the work is done in `u128`.
pub fn diagonal_of(width: u32, height: u32) -> u64 {
    let squared = u128::from(width).pow(2) + u128::from(height).pow(2);
    let mut root = (squared as f64).sqrt() as u128;
    // Correct float rounding in either direction
    while root * root > squared {
        root -= 1;
    }
    while root * root < squared {
        root += 1;
    }
    root as u64
}
