//! Format conversion.

use serde::Deserialize;

use super::{
    decode_input, encode_output, output_filename, parse_format, rejected, resolve_quality,
    ImageInput, OperationOutput,
};
use crate::context::ServiceContext;
use crate::error::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertRequest {
    pub format: String,
    #[serde(default)]
    pub quality: Option<u32>,
}

impl ConvertRequest {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            quality: None,
        }
    }

    pub fn with_quality(mut self, quality: u32) -> Self {
        self.quality = Some(quality);
        self
    }
}

/// Re-encode `input` as `request.format`. Output is named `<base>.<format>`.
pub fn convert(
    ctx: &ServiceContext,
    input: ImageInput<'_>,
    request: &ConvertRequest,
) -> Result<OperationOutput, ServiceError> {
    let choice = parse_format(&request.format).map_err(|e| rejected("convert", e))?;
    let quality = resolve_quality(request.quality, ctx.default_quality())
        .map_err(|e| rejected("convert", e))?;

    let decoded = decode_input(ctx, &input)?;
    let filename = output_filename(input.filename, "", &choice.label);
    encode_output(ctx, &decoded.image, &choice, quality, filename, "convert")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::operations::test_support::{context, rgb_png};

    #[test]
    fn test_convert_png_to_jpeg() {
        let ctx = context();
        let data = rgb_png(32, 16);
        let out = convert(
            &ctx,
            ImageInput::new("photo.png", &data),
            &ConvertRequest::new("jpg").with_quality(80),
        )
        .unwrap();

        assert_eq!(out.filename, "photo.jpg");
        assert_eq!(out.content_type, "image/jpeg");
        assert_eq!((out.width, out.height), (32, 16));
        assert_eq!(&out.data[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_convert_keeps_requested_label() {
        let ctx = context();
        let data = rgb_png(4, 4);
        let out = convert(&ctx, ImageInput::new("a.png", &data), &ConvertRequest::new("JPEG"))
            .unwrap();
        assert_eq!(out.filename, "a.jpeg");
    }

    #[test]
    fn test_convert_to_webp() {
        let ctx = context();
        let data = rgb_png(10, 10);
        let out = convert(&ctx, ImageInput::new("a.png", &data), &ConvertRequest::new("webp"))
            .unwrap();
        assert_eq!(out.content_type, "image/webp");
        assert_eq!(&out.data[..4], b"RIFF");
    }

    #[test]
    fn test_bad_quality_rejected_before_decode() {
        let ctx = context();
        let err = convert(
            &ctx,
            ImageInput::new("a.png", b"not an image"),
            &ConvertRequest::new("png").with_quality(0),
        )
        .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_corrupt_input_is_decode_error() {
        let ctx = context();
        let err = convert(
            &ctx,
            ImageInput::new("a.png", b"not an image"),
            &ConvertRequest::new("png"),
        )
        .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Decode);
    }
}
