//! Error Scenario Tests
//!
//! Every rejected request maps to one error category and status code, and
//! invalid parameters are caught before any decoding.

use super::test_harness::{create_test_photo, encode, test_context};
use image::ImageFormat;
use imagepress::config::Config;
use imagepress::context::ServiceContext;
use imagepress::operations::{
    convert, crop, info, metadata, resize, watermark, ConvertRequest, CropRequest, ImageInput,
    InfoRequest, ResizeRequest, WatermarkRequest,
};
use imagepress::ErrorCategory;

const GARBAGE: &[u8] = b"\x89PNG but not really";

#[test]
fn test_corrupt_bytes_are_decode_errors_everywhere() {
    let ctx = test_context();
    let input = ImageInput::new("broken.png", GARBAGE);

    let errors = vec![
        convert(&ctx, input, &ConvertRequest::new("png")).unwrap_err(),
        info(&ctx, input, &InfoRequest::default()).unwrap_err(),
        metadata(&ctx, input).unwrap_err(),
        watermark(&ctx, input, &WatermarkRequest::new("X", "png")).unwrap_err(),
        resize(&ctx, input, &ResizeRequest::new("png").with_width(10)).unwrap_err(),
        crop(&ctx, input, &CropRequest::new(0, 0, 1, 1, "png")).unwrap_err(),
    ];

    for err in errors {
        assert_eq!(err.category(), ErrorCategory::Decode, "{}", err);
        assert_eq!(err.to_http_status(), 400);
    }
}

#[test]
fn test_unknown_format_is_validation_error() {
    let ctx = test_context();
    let err = convert(&ctx, ImageInput::new("a.png", GARBAGE), &ConvertRequest::new("tiff"))
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);
    assert!(err.to_string().contains("tiff"));
}

#[test]
fn test_quality_out_of_range() {
    let ctx = test_context();
    let data = encode(&create_test_photo(8, 8), ImageFormat::Png);
    for quality in [0, 101, 1000] {
        let err = convert(
            &ctx,
            ImageInput::new("a.png", &data),
            &ConvertRequest::new("jpg").with_quality(quality),
        )
        .unwrap_err();
        assert!(err.is_validation());
    }
}

#[test]
fn test_oversized_input_is_rejected() {
    let mut config = Config::default();
    config.watermark.load_system_fonts = false;
    config.image.security.max_source_pixels = 100;
    let ctx = ServiceContext::new(config);

    let data = encode(&create_test_photo(20, 20), ImageFormat::Png);
    let err = convert(&ctx, ImageInput::new("big.png", &data), &ConvertRequest::new("png"))
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Decode);
}

#[test]
fn test_file_size_limit() {
    let mut config = Config::default();
    config.watermark.load_system_fonts = false;
    config.image.security.max_source_file_size = 16;
    let ctx = ServiceContext::new(config);

    let data = encode(&create_test_photo(20, 20), ImageFormat::Png);
    let err = metadata(&ctx, ImageInput::new("big.png", &data)).unwrap_err();
    assert_eq!(err.to_http_status(), 413);
}

#[test]
fn test_crop_outside_image() {
    let ctx = test_context();
    let data = encode(&create_test_photo(50, 40), ImageFormat::Png);
    let err = crop(
        &ctx,
        ImageInput::new("a.png", &data),
        &CropRequest::new(10, 10, 60, 30, "png"),
    )
    .unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("Image dimensions are 50x40"));
}
