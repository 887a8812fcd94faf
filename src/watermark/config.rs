//! Watermark configuration types.
//!
//! This module defines:
//! - [`WatermarkConfig`], the per-request watermark parameters
//! - [`WatermarkSettings`], the service-wide defaults and font candidates

use serde::{Deserialize, Serialize};

use super::WatermarkError;
use crate::constants::{
    DEFAULT_FONT_CANDIDATES, DEFAULT_MAX_WATERMARK_CANVAS_PIXELS, DEFAULT_WATERMARK_DENSITY,
    DEFAULT_WATERMARK_OPACITY, MAX_WATERMARK_DENSITY, MIN_WATERMARK_DENSITY,
};

fn default_opacity() -> f32 {
    DEFAULT_WATERMARK_OPACITY
}

fn default_density() -> u32 {
    DEFAULT_WATERMARK_DENSITY
}

fn default_max_canvas_pixels() -> u64 {
    DEFAULT_MAX_WATERMARK_CANVAS_PIXELS
}

fn default_font_candidates() -> Vec<String> {
    DEFAULT_FONT_CANDIDATES
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Parameters for one diagonal tiled text watermark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkConfig {
    /// Text drawn in every tile
    pub text: String,

    /// Opacity from 0.0 (transparent) to 1.0 (opaque) (default: 0.5)
    #[serde(default = "default_opacity")]
    pub opacity: f32,

    /// Tile packing, 1 (sparse) to 50 (dense) (default: 15)
    #[serde(default = "default_density")]
    pub density: u32,

    /// Font size in pixels; derived from the image size when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
}

impl WatermarkConfig {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            opacity: DEFAULT_WATERMARK_OPACITY,
            density: DEFAULT_WATERMARK_DENSITY,
            font_size: None,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_density(mut self, density: u32) -> Self {
        self.density = density;
        self
    }

    pub fn with_font_size(mut self, font_size: u32) -> Self {
        self.font_size = Some(font_size);
        self
    }

    /// Validate every field. Out-of-range values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), WatermarkError> {
        if self.text.is_empty() {
            return Err(WatermarkError::ConfigError(
                "Watermark text cannot be empty".to_string(),
            ));
        }

        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(WatermarkError::ConfigError(format!(
                "Opacity must be between 0.0 and 1.0, got {}",
                self.opacity
            )));
        }

        if !(MIN_WATERMARK_DENSITY..=MAX_WATERMARK_DENSITY).contains(&self.density) {
            return Err(WatermarkError::ConfigError(format!(
                "Density must be between {} and {}, got {}",
                MIN_WATERMARK_DENSITY, MAX_WATERMARK_DENSITY, self.density
            )));
        }

        if self.font_size == Some(0) {
            return Err(WatermarkError::ConfigError(
                "Font size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Alpha of the text fill, `round(255 * opacity)`
    pub fn fill_alpha(&self) -> u8 {
        (255.0 * self.opacity.clamp(0.0, 1.0)).round() as u8
    }
}

/// Service-wide watermark settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkSettings {
    /// Opacity used when a request does not give one
    #[serde(default = "default_opacity")]
    pub default_opacity: f32,

    /// Density used when a request does not give one
    #[serde(default = "default_density")]
    pub default_density: u32,

    /// Font family names or font file paths, tried in order
    #[serde(default = "default_font_candidates")]
    pub font_candidates: Vec<String>,

    /// Load installed system fonts into the font library at startup
    #[serde(default = "default_true")]
    pub load_system_fonts: bool,

    /// Upper bound on the working canvas (2 · diagonal squared) in pixels
    #[serde(default = "default_max_canvas_pixels")]
    pub max_canvas_pixels: u64,
}

fn default_true() -> bool {
    true
}

impl Default for WatermarkSettings {
    fn default() -> Self {
        Self {
            default_opacity: DEFAULT_WATERMARK_OPACITY,
            default_density: DEFAULT_WATERMARK_DENSITY,
            font_candidates: default_font_candidates(),
            load_system_fonts: true,
            max_canvas_pixels: DEFAULT_MAX_WATERMARK_CANVAS_PIXELS,
        }
    }
}

impl WatermarkSettings {
    /// Validate the defaults with the same rules as a request.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_canvas_pixels == 0 {
            return Err("max_canvas_pixels must be greater than 0".to_string());
        }
        WatermarkConfig::new("defaults")
            .with_opacity(self.default_opacity)
            .with_density(self.default_density)
            .validate()
            .map_err(|e| e.to_string())
    }
}
