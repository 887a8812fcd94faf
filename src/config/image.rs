//! Encoding defaults and input limits.

use serde::{Deserialize, Serialize};

use crate::codec::{EncoderSettings, SecurityConfig};
use crate::constants::{
    DEFAULT_AVIF_SPEED, DEFAULT_PNG_OPTIMIZATION_LEVEL, DEFAULT_QUALITY, MAX_QUALITY, MIN_QUALITY,
};

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

fn default_optimize_png() -> bool {
    true
}

fn default_png_optimization_level() -> u8 {
    DEFAULT_PNG_OPTIMIZATION_LEVEL
}

fn default_avif_speed() -> u8 {
    DEFAULT_AVIF_SPEED
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Default quality for lossy formats (JPEG, WebP, AVIF)
    #[serde(default = "default_quality")]
    pub default_quality: u8,

    /// Run lossless oxipng optimisation on PNG output
    #[serde(default = "default_optimize_png")]
    pub optimize_png: bool,

    /// oxipng preset, 0 (fast) to 6 (smallest)
    #[serde(default = "default_png_optimization_level")]
    pub png_optimization_level: u8,

    /// AVIF speed, 1 (slowest/best) to 10 (fastest)
    #[serde(default = "default_avif_speed")]
    pub avif_speed: u8,

    /// Input size and image-bomb limits
    #[serde(default)]
    pub security: SecurityConfig,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            default_quality: default_quality(),
            optimize_png: default_optimize_png(),
            png_optimization_level: default_png_optimization_level(),
            avif_speed: default_avif_speed(),
            security: SecurityConfig::default(),
        }
    }
}

impl ImageConfig {
    /// Encoder tuning derived from this section
    pub fn encoder_settings(&self) -> EncoderSettings {
        EncoderSettings {
            optimize_png: self.optimize_png,
            png_level: self.png_optimization_level,
            avif_speed: self.avif_speed,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&self.default_quality) {
            return Err(format!(
                "image.default_quality must be between {} and {}, got {}",
                MIN_QUALITY, MAX_QUALITY, self.default_quality
            ));
        }
        if self.png_optimization_level > 6 {
            return Err(format!(
                "image.png_optimization_level must be between 0 and 6, got {}",
                self.png_optimization_level
            ));
        }
        if !(1..=10).contains(&self.avif_speed) {
            return Err(format!(
                "image.avif_speed must be between 1 and 10, got {}",
                self.avif_speed
            ));
        }

        let security = &self.security;
        if security.max_source_width == 0
            || security.max_source_height == 0
            || security.max_source_pixels == 0
            || security.max_source_file_size == 0
        {
            return Err("image.security limits must be greater than 0".to_string());
        }

        Ok(())
    }
}
