//! Rectangular crop.

use serde::Deserialize;

use super::{
    decode_input, encode_output, output_filename, parse_format, rejected, resolve_quality,
    ImageInput, OperationOutput,
};
use crate::context::ServiceContext;
use crate::error::ServiceError;

/// Crop box in pixels: columns `left..right`, rows `top..bottom`.
#[derive(Debug, Clone, Deserialize)]
pub struct CropRequest {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
    pub format: String,
    #[serde(default)]
    pub quality: Option<u32>,
}

impl CropRequest {
    pub fn new(left: i64, top: i64, right: i64, bottom: i64, format: impl Into<String>) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            format: format.into(),
            quality: None,
        }
    }

    pub fn with_quality(mut self, quality: u32) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Check the box against a `width` × `height` image and return it as
    /// `(x, y, w, h)`.
    pub fn bounds_within(&self, width: u32, height: u32) -> Result<(u32, u32, u32, u32), ServiceError> {
        let (w, h) = (width as i64, height as i64);
        if self.left < 0
            || self.top < 0
            || self.right > w
            || self.bottom > h
            || self.left >= self.right
            || self.top >= self.bottom
        {
            return Err(ServiceError::validation(format!(
                "Invalid crop coordinates. Image dimensions are {}x{}.",
                width, height
            )));
        }

        // In range of u32 after the checks above
        Ok((
            self.left as u32,
            self.top as u32,
            (self.right - self.left) as u32,
            (self.bottom - self.top) as u32,
        ))
    }
}

/// Crop `input` to the requested box. Output is named `<base>_cropped.<format>`.
pub fn crop(
    ctx: &ServiceContext,
    input: ImageInput<'_>,
    request: &CropRequest,
) -> Result<OperationOutput, ServiceError> {
    let choice = parse_format(&request.format).map_err(|e| rejected("crop", e))?;
    let quality = resolve_quality(request.quality, ctx.default_quality())
        .map_err(|e| rejected("crop", e))?;

    let decoded = decode_input(ctx, &input)?;
    let (x, y, w, h) = request
        .bounds_within(decoded.width(), decoded.height())
        .map_err(|e| rejected("crop", e))?;
    let cropped = decoded.image.crop_imm(x, y, w, h);

    let filename = output_filename(input.filename, "_cropped", &choice.label);
    encode_output(ctx, &cropped, &choice, quality, filename, "crop")
}
