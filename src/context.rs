//! Process-wide state shared read-only by every operation.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::codec::{EncoderSettings, SecurityConfig};
use crate::config::Config;
use crate::watermark::{FontLibrary, WatermarkProcessor};

/// Created once at startup and passed by reference to operations.
#[derive(Debug)]
pub struct ServiceContext {
    config: Config,
    started_at: DateTime<Utc>,
    started: Instant,
    fonts: FontLibrary,
}

impl ServiceContext {
    pub fn new(config: Config) -> Self {
        let fonts = FontLibrary::new(config.watermark.load_system_fonts);
        Self::with_fonts(config, fonts)
    }

    /// Build a context around an existing font library.
    pub fn with_fonts(config: Config, fonts: FontLibrary) -> Self {
        let context = Self {
            config,
            started_at: Utc::now(),
            started: Instant::now(),
            fonts,
        };
        info!(
            service = %context.config.service.name,
            font_faces = context.fonts.face_count(),
            font_candidates = context.config.watermark.font_candidates.len(),
            "Service context initialised"
        );
        context
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    pub fn security(&self) -> &SecurityConfig {
        &self.config.image.security
    }

    pub fn encoder_settings(&self) -> EncoderSettings {
        self.config.image.encoder_settings()
    }

    pub fn default_quality(&self) -> u8 {
        self.config.image.default_quality
    }

    /// Processor using the configured font candidates and canvas limit.
    pub fn watermark_processor(&self) -> WatermarkProcessor<'_> {
        WatermarkProcessor::new(&self.fonts, &self.config.watermark.font_candidates)
            .with_max_canvas_pixels(self.config.watermark.max_canvas_pixels)
    }
}
