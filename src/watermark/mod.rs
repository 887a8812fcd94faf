//! Diagonal tiled text watermarks.
//!
//! The text is tiled horizontally across a square canvas twice the image
//! diagonal on a side, the canvas is rotated 45° counter-clockwise, and the
//! image-sized window at its center is alpha-blended onto the image.
//!
//! # Pipeline
//!
//! ```text
//! image size ─► GeometryPlan ─► TileLayout ─► render_pattern ─► rotate_and_crop ─► composite
//!                    │               ▲
//!                    └─ font size ─► resolve_font (path │ family │ 8x8 bitmap)
//! ```
//!
//! # Configuration Example
//!
//! ```yaml
//! watermark:
//!   default_opacity: 0.5
//!   default_density: 15
//!   font_candidates:
//!     - "DejaVu Sans"
//!     - "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf"
//! ```

pub mod compositor;
pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod pattern;
pub mod processor;
pub mod rotate;
pub mod text_renderer;

// Re-export main types for convenience
pub use compositor::{composite, finalize};
pub use config::{WatermarkConfig, WatermarkSettings};
pub use error::WatermarkError;
pub use geometry::{diagonal_of, CropWindow, GeometryPlan};
pub use layout::{TileLayout, TilePosition, TilePositions};
pub use pattern::{render_pattern, text_fill};
pub use processor::{apply_with_font, WatermarkProcessor};
pub use rotate::{crop_window, rotate_and_crop, rotate_canvas};
pub use text_renderer::{
    resolve_font, FontFailure, FontLibrary, FontResolution, WatermarkFont, BITMAP_CELL,
};
