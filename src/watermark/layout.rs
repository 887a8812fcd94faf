//! Tile layout for the watermark canvas.
//!
//! Turns the measured text size, the canvas size and the requested density
//! into a brick pattern of draw positions:
//!
//! ```text
//!   row 0:     T     T     T     T
//!   row 1:  T     T     T     T     T
//!   row 2:     T     T     T     T
//! ```
//!
//! Gaps shrink as density grows (`45 / density` times the text extent) but
//! never drop below 1.2 times the text extent, so tiles do not overlap.

use super::WatermarkError;
use crate::constants::{
    MAX_WATERMARK_DENSITY, MIN_TILE_GAP_RATIO, MIN_WATERMARK_DENSITY, TILE_SPACING_BASE,
};

/// A point on the canvas where one copy of the text is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePosition {
    pub x: f32,
    pub y: f32,
}

impl TilePosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Spacing of the tile grid for one text/canvas/density combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileLayout {
    canvas_width: f32,
    canvas_height: f32,
    horizontal_gap: f32,
    vertical_gap: f32,
}

impl TileLayout {
    /// Build the layout.
    ///
    /// # Errors
    ///
    /// - `RenderError` when the text measured zero width or height
    /// - `ConfigError` when density is outside `1..=50`
    pub fn new(
        text_size: (u32, u32),
        canvas_size: (u32, u32),
        density: u32,
    ) -> Result<Self, WatermarkError> {
        let (text_width, text_height) = text_size;
        if text_width == 0 || text_height == 0 {
            return Err(WatermarkError::RenderError(format!(
                "text measured {}x{} pixels, nothing to tile",
                text_width, text_height
            )));
        }
        if !(MIN_WATERMARK_DENSITY..=MAX_WATERMARK_DENSITY).contains(&density) {
            return Err(WatermarkError::ConfigError(format!(
                "Density must be between {} and {}, got {}",
                MIN_WATERMARK_DENSITY, MAX_WATERMARK_DENSITY, density
            )));
        }

        let spacing_factor = TILE_SPACING_BASE / density as f32;
        let gap = |extent: u32| -> f32 {
            let extent = extent as f32;
            (extent * spacing_factor).max(extent * MIN_TILE_GAP_RATIO)
        };

        Ok(Self {
            canvas_width: canvas_size.0 as f32,
            canvas_height: canvas_size.1 as f32,
            horizontal_gap: gap(text_width),
            vertical_gap: gap(text_height),
        })
    }

    pub fn horizontal_gap(&self) -> f32 {
        self.horizontal_gap
    }

    pub fn vertical_gap(&self) -> f32 {
        self.vertical_gap
    }

    /// Row-major iterator over every draw position. Each call starts over.
    pub fn positions(&self) -> TilePositions {
        TilePositions {
            layout: *self,
            row: 0,
            col: 0,
        }
    }

    /// Number of positions `positions()` yields.
    pub fn tile_count(&self) -> usize {
        self.positions().count()
    }

    /// x of the first tile in `row`: half a gap on even rows, flush on odd rows
    fn row_offset(&self, row: u32) -> f32 {
        if row % 2 == 0 {
            self.horizontal_gap / 2.0
        } else {
            0.0
        }
    }
}

/// Iterator returned by [`TileLayout::positions`].
#[derive(Debug, Clone)]
pub struct TilePositions {
    layout: TileLayout,
    row: u32,
    col: u32,
}

impl Iterator for TilePositions {
    type Item = TilePosition;

    fn next(&mut self) -> Option<TilePosition> {
        loop {
            let y = self.row as f32 * self.layout.vertical_gap;
            if y >= self.layout.canvas_height {
                return None;
            }

            let x = self.layout.row_offset(self.row) + self.col as f32 * self.layout.horizontal_gap;
            if x < self.layout.canvas_width {
                self.col += 1;
                return Some(TilePosition::new(x, y));
            }

            self.row += 1;
            self.col = 0;
        }
    }
}
