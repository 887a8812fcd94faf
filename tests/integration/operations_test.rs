//! Operation End-to-End Tests
//!
//! Convert, info, metadata, resize, crop and status through the public API.

use super::test_harness::{create_test_photo, decode, encode, test_context};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use imagepress::codec::{self, ColorMode};
use imagepress::operations::{
    convert, crop, info, metadata, resize, status, to_json, ConvertRequest, CropRequest,
    FormatReport, ImageInput, InfoRequest, ResizeRequest,
};
use rstest::rstest;

#[rstest]
#[case("png", "image/png")]
#[case("jpg", "image/jpeg")]
#[case("webp", "image/webp")]
fn test_same_format_round_trip_keeps_size_and_mode(
    #[case] format: &str,
    #[case] content_type: &str,
) {
    let ctx = test_context();
    let photo = create_test_photo(64, 48);
    let first = convert(
        &ctx,
        ImageInput::new("photo.png", &encode(&photo, ImageFormat::Png)),
        &ConvertRequest::new(format).with_quality(90),
    )
    .unwrap();
    assert_eq!(first.content_type, content_type);

    let second = convert(
        &ctx,
        ImageInput::new(&first.filename, &first.data),
        &ConvertRequest::new(format).with_quality(90),
    )
    .unwrap();

    let decoded = codec::decode(&second.data, ctx.security()).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (64, 48));
    assert_eq!(decoded.mode, ColorMode::Rgb);
}

#[test]
fn test_grayscale_png_stays_grayscale() {
    let ctx = test_context();
    let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(10, 10, Luma([90])));
    let output = convert(
        &ctx,
        ImageInput::new("gray.png", &encode(&gray, ImageFormat::Png)),
        &ConvertRequest::new("png"),
    )
    .unwrap();
    let decoded = codec::decode(&output.data, ctx.security()).unwrap();
    assert_eq!(decoded.mode, ColorMode::Grayscale);
}

#[test]
fn test_avif_conversion_produces_avif_container() {
    let ctx = test_context();
    let data = encode(&create_test_photo(16, 16), ImageFormat::Png);
    let output = convert(
        &ctx,
        ImageInput::new("photo.png", &data),
        &ConvertRequest::new("avif").with_quality(60),
    )
    .unwrap();
    assert_eq!(output.filename, "photo.avif");
    assert_eq!(output.content_type, "image/avif");
    assert_eq!(&output.data[4..8], b"ftyp");
}

#[test]
fn test_info_report_as_json() {
    let ctx = test_context();
    let data = encode(&create_test_photo(100, 80), ImageFormat::Png);
    let report = info(&ctx, ImageInput::new("photo.png", &data), &InfoRequest::default()).unwrap();

    assert_eq!(report.original.size_bytes, data.len());
    assert_eq!(report.original.mode, "RGB");
    match report.format("jpg") {
        Some(FormatReport::Encoded {
            size_bytes,
            savings,
            ..
        }) => {
            assert_eq!(savings.bytes, data.len() as i64 - *size_bytes as i64);
        }
        other => panic!("unexpected jpg report: {:?}", other),
    }

    let json: serde_json::Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();
    let keys: Vec<&String> = json["formats"].as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 4);
    assert_eq!(json["original"]["width"], 100);
}

#[test]
fn test_metadata_of_jpeg() {
    let ctx = test_context();
    let data = encode(&create_test_photo(30, 20), ImageFormat::Jpeg);
    let report = metadata(&ctx, ImageInput::new("camera.jpg", &data)).unwrap();

    assert_eq!(report.filename, "camera.jpg");
    assert_eq!(report.format, "JPEG");
    assert_eq!(report.mode, "RGB");
    assert_eq!((report.size.width, report.size.height), (30, 20));
}

#[test]
fn test_resize_keeps_aspect_ratio() {
    let ctx = test_context();
    let data = encode(&create_test_photo(400, 300), ImageFormat::Png);
    let output = resize(
        &ctx,
        ImageInput::new("photo.png", &data),
        &ResizeRequest::new("jpg").with_width(200).with_height(200),
    )
    .unwrap();

    assert_eq!(output.filename, "photo_resized.jpg");
    let resized = decode(&output.data);
    assert_eq!((resized.width(), resized.height()), (200, 150));
}

#[test]
fn test_crop_box() {
    let ctx = test_context();
    let data = encode(&create_test_photo(400, 300), ImageFormat::Png);
    let output = crop(
        &ctx,
        ImageInput::new("photo.png", &data),
        &CropRequest::new(100, 50, 300, 250, "webp"),
    )
    .unwrap();

    assert_eq!(output.filename, "photo_cropped.webp");
    let cropped = decode(&output.data);
    assert_eq!((cropped.width(), cropped.height()), (200, 200));
}

#[test]
fn test_status() {
    let ctx = test_context();
    let report = status(&ctx);
    assert_eq!(report.message, "Image Processing API is running");
    assert!(report.started_at <= chrono::Utc::now());
}
