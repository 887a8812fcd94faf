//! Resize by width, height or percentage.

use serde::Deserialize;

use super::{
    decode_input, encode_output, output_filename, parse_format, rejected, resolve_quality,
    ImageInput, OperationOutput,
};
use crate::codec::{resize_exact, validate_dimensions};
use crate::context::ServiceContext;
use crate::error::ServiceError;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResizeRequest {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Scale factor in percent; takes precedence over width/height
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default = "default_true")]
    pub maintain_aspect_ratio: bool,
    pub format: String,
    #[serde(default)]
    pub quality: Option<u32>,
}

impl ResizeRequest {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            width: None,
            height: None,
            percentage: None,
            maintain_aspect_ratio: true,
            format: format.into(),
            quality: None,
        }
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_percentage(mut self, percentage: f64) -> Self {
        self.percentage = Some(percentage);
        self
    }

    pub fn with_aspect_ratio(mut self, maintain: bool) -> Self {
        self.maintain_aspect_ratio = maintain;
        self
    }

    pub fn with_quality(mut self, quality: u32) -> Self {
        self.quality = Some(quality);
        self
    }

    fn validate(&self) -> Result<(), ServiceError> {
        if self.width.is_none() && self.height.is_none() && self.percentage.is_none() {
            return Err(ServiceError::validation(
                "At least one of width, height, or percentage must be provided",
            ));
        }
        if let Some(percentage) = self.percentage {
            if !percentage.is_finite() || percentage <= 0.0 {
                return Err(ServiceError::validation(format!(
                    "Percentage must be greater than 0, got {}",
                    percentage
                )));
            }
        }
        if self.width == Some(0) || self.height == Some(0) {
            return Err(ServiceError::validation(
                "Width and height must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Target size for a `width` × `height` source.
///
/// Precedence: percentage, then width and height together, then width
/// alone, then height alone. Fractional results are truncated.
pub fn target_dimensions(
    width: u32,
    height: u32,
    request: &ResizeRequest,
) -> Result<(u32, u32), ServiceError> {
    let (w, h) = (width as f64, height as f64);
    let aspect = request.maintain_aspect_ratio;

    let target = match (request.percentage, request.width, request.height) {
        (Some(pct), _, _) => ((w * pct / 100.0) as u32, (h * pct / 100.0) as u32),
        (None, Some(tw), Some(th)) if aspect => {
            let ratio = (tw as f64 / w).min(th as f64 / h);
            ((w * ratio) as u32, (h * ratio) as u32)
        }
        (None, Some(tw), Some(th)) => (tw, th),
        (None, Some(tw), None) if aspect => (tw, (h * tw as f64 / w) as u32),
        (None, Some(tw), None) => (tw, height),
        (None, None, Some(th)) if aspect => ((w * th as f64 / h) as u32, th),
        (None, None, Some(th)) => (width, th),
        (None, None, None) => {
            return Err(ServiceError::validation(
                "At least one of width, height, or percentage must be provided",
            ))
        }
    };

    if target.0 == 0 || target.1 == 0 {
        return Err(ServiceError::validation(format!(
            "Resize of {}x{} would produce an empty {}x{} image",
            width, height, target.0, target.1
        )));
    }
    Ok(target)
}

/// Resize `input` with Lanczos3. Output is named `<base>_resized.<format>`.
pub fn resize(
    ctx: &ServiceContext,
    input: ImageInput<'_>,
    request: &ResizeRequest,
) -> Result<OperationOutput, ServiceError> {
    request.validate().map_err(|e| rejected("resize", e))?;
    let choice = parse_format(&request.format).map_err(|e| rejected("resize", e))?;
    let quality = resolve_quality(request.quality, ctx.default_quality())
        .map_err(|e| rejected("resize", e))?;

    let decoded = decode_input(ctx, &input)?;
    let (target_w, target_h) = target_dimensions(decoded.width(), decoded.height(), request)
        .map_err(|e| rejected("resize", e))?;
    validate_dimensions(target_w, target_h, ctx.security())
        .map_err(|e| rejected("resize", ServiceError::validation(e.to_string())))?;
    let resized = resize_exact(&decoded.image, target_w, target_h)?;

    let filename = output_filename(input.filename, "_resized", &choice.label);
    encode_output(ctx, &resized, &choice, quality, filename, "resize")
}
