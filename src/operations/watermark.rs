//! Diagonal tiled text watermark.

use serde::Deserialize;

use super::{
    decode_input, encode_output, output_filename, parse_format, rejected, resolve_quality,
    ImageInput, OperationOutput,
};
use crate::context::ServiceContext;
use crate::error::ServiceError;
use crate::watermark::{finalize, WatermarkConfig};

/// Watermark parameters as sent by a caller. Absent values take the
/// configured defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct WatermarkRequest {
    pub text: String,
    #[serde(default)]
    pub opacity: Option<f32>,
    #[serde(default)]
    pub density: Option<u32>,
    #[serde(default)]
    pub font_size: Option<u32>,
    pub format: String,
    #[serde(default)]
    pub quality: Option<u32>,
}

impl WatermarkRequest {
    pub fn new(text: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            opacity: None,
            density: None,
            font_size: None,
            format: format.into(),
            quality: None,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_density(mut self, density: u32) -> Self {
        self.density = Some(density);
        self
    }

    pub fn with_font_size(mut self, font_size: u32) -> Self {
        self.font_size = Some(font_size);
        self
    }

    pub fn with_quality(mut self, quality: u32) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Build the watermark configuration, filling defaults from `ctx`.
    pub fn to_config(&self, ctx: &ServiceContext) -> WatermarkConfig {
        let settings = &ctx.config().watermark;
        WatermarkConfig {
            text: self.text.clone(),
            opacity: self.opacity.unwrap_or(settings.default_opacity),
            density: self.density.unwrap_or(settings.default_density),
            font_size: self.font_size,
        }
    }
}

/// Watermark `input` and encode it as `request.format`.
///
/// Every parameter is checked before the image is decoded. The output keeps
/// the input's dimensions and is named `<base>_watermarked.<format>`. Formats
/// without alpha get the result flattened onto white.
pub fn watermark(
    ctx: &ServiceContext,
    input: ImageInput<'_>,
    request: &WatermarkRequest,
) -> Result<OperationOutput, ServiceError> {
    let config = request.to_config(ctx);
    config
        .validate()
        .map_err(|e| rejected("watermark", e.into()))?;
    let choice = parse_format(&request.format).map_err(|e| rejected("watermark", e))?;
    let quality = resolve_quality(request.quality, ctx.default_quality())
        .map_err(|e| rejected("watermark", e))?;

    let decoded = decode_input(ctx, &input)?;
    let composited = ctx.watermark_processor().apply(&decoded.image, &config)?;
    let result = finalize(composited, choice.format.supports_alpha());

    let filename = output_filename(input.filename, "_watermarked", &choice.label);
    encode_output(ctx, &result, &choice, quality, filename, "watermark")
}
