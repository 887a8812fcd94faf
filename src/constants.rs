// Constants module - centralized default values for configuration
//
// This module defines the default values used throughout the codebase.
// Using constants instead of magic numbers improves maintainability
// and makes it easier to understand and modify defaults.

// =============================================================================
// Encoding defaults
// =============================================================================

/// Default quality for lossy formats (JPEG, WebP, AVIF)
pub const DEFAULT_QUALITY: u8 = 85;

/// Lowest accepted quality value
pub const MIN_QUALITY: u8 = 1;

/// Highest accepted quality value
pub const MAX_QUALITY: u8 = 100;

/// Default AVIF encoder speed (1 = slowest/best, 10 = fastest)
pub const DEFAULT_AVIF_SPEED: u8 = 6;

/// Default oxipng optimisation preset (0-6)
pub const DEFAULT_PNG_OPTIMIZATION_LEVEL: u8 = 2;

/// Formats reported by the info operation, in report order
pub const INFO_REPORT_FORMATS: [&str; 4] = ["avif", "webp", "png", "jpg"];

// =============================================================================
// Watermark defaults
// =============================================================================

/// Default watermark opacity
pub const DEFAULT_WATERMARK_OPACITY: f32 = 0.5;

/// Default watermark density
pub const DEFAULT_WATERMARK_DENSITY: u32 = 15;

/// Lowest accepted watermark density
pub const MIN_WATERMARK_DENSITY: u32 = 1;

/// Highest accepted watermark density
pub const MAX_WATERMARK_DENSITY: u32 = 50;

/// Spacing base divided by density to get the gap factor
pub const TILE_SPACING_BASE: f32 = 45.0;

/// Minimum gap between tiles, as a multiple of the text extent
pub const MIN_TILE_GAP_RATIO: f32 = 1.2;

/// Rotation applied to the tiled canvas, in degrees
pub const WATERMARK_ANGLE_DEGREES: f32 = 45.0;

/// Auto font size is max(width, height) divided by this value
pub const AUTO_FONT_SIZE_DIVISOR: u32 = 20;

/// Largest working canvas the watermark pipeline will allocate (16384²).
/// Two RGBA canvases of this size are alive during rotation.
pub const DEFAULT_MAX_WATERMARK_CANVAS_PIXELS: u64 = 16_384 * 16_384;

/// Font candidates tried before the built-in bitmap font
pub const DEFAULT_FONT_CANDIDATES: [&str; 4] =
    ["Arial", "DejaVu Sans", "Liberation Sans", "Helvetica"];

// =============================================================================
// Security defaults
// =============================================================================

/// Default maximum input file size (50 MB)
pub const DEFAULT_MAX_FILE_SIZE: usize = 50 * 1024 * 1024;

/// Default maximum source image width
pub const DEFAULT_MAX_SOURCE_WIDTH: u32 = 10_000;

/// Default maximum source image height
pub const DEFAULT_MAX_SOURCE_HEIGHT: u32 = 10_000;

/// Default maximum source pixel count (100 megapixels)
pub const DEFAULT_MAX_SOURCE_PIXELS: u64 = 100_000_000;

// =============================================================================
// Service defaults
// =============================================================================

/// Message reported by the status operation
pub const DEFAULT_STATUS_MESSAGE: &str = "Image Processing API is running";

/// Default log level when RUST_LOG is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";
