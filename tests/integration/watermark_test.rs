//! Diagonal Watermark End-to-End Tests
//!
//! Runs the full pipeline through the public API:
//!   bytes → decode → plan → tile → rotate/crop → composite → encode

use super::test_harness::{
    create_test_photo, create_test_png_with_alpha, decode, encode, system_font_context,
    test_context,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imagepress::operations::{watermark, ImageInput, WatermarkRequest};
use imagepress::constants::WATERMARK_ANGLE_DEGREES;
use imagepress::watermark::{
    apply_with_font, composite, render_pattern, resolve_font, rotate_and_crop, text_fill,
    FontLibrary, GeometryPlan, TileLayout, WatermarkConfig, WatermarkProcessor,
};
use imagepress::ErrorCategory;

#[test]
fn test_sample_watermark_on_photo() {
    let ctx = test_context();
    let photo = create_test_photo(1000, 600);
    let data = encode(&photo, ImageFormat::Png);

    let request = WatermarkRequest::new("SAMPLE", "png")
        .with_opacity(0.5)
        .with_density(15);
    let output = watermark(&ctx, ImageInput::new("photo.jpg", &data), &request).unwrap();

    assert_eq!(output.filename, "photo_watermarked.png");
    assert_eq!(output.content_type, "image/png");

    let marked = decode(&output.data);
    assert_eq!((marked.width(), marked.height()), (1000, 600));
    assert_ne!(marked.to_rgb8(), photo.to_rgb8());
}

#[test]
fn test_watermark_with_system_fonts_when_available() {
    let ctx = system_font_context();
    let data = encode(&create_test_photo(320, 200), ImageFormat::Png);
    let output = watermark(
        &ctx,
        ImageInput::new("photo.png", &data),
        &WatermarkRequest::new("SAMPLE", "webp").with_quality(80),
    )
    .unwrap();

    assert_eq!(output.filename, "photo_watermarked.webp");
    assert_eq!((output.width, output.height), (320, 200));
}

#[test]
fn test_output_dimensions_match_input_for_odd_sizes() {
    let ctx = test_context();
    for (width, height) in [(1, 1), (3, 500), (501, 7), (257, 129)] {
        let data = encode(&create_test_photo(width, height), ImageFormat::Png);
        let output = watermark(
            &ctx,
            ImageInput::new("odd.png", &data),
            &WatermarkRequest::new("W", "png"),
        )
        .unwrap();
        let marked = decode(&output.data);
        assert_eq!((marked.width(), marked.height()), (width, height));
    }
}

#[test]
fn test_zero_opacity_is_identity() {
    let ctx = test_context();
    let photo = create_test_photo(200, 150);
    let config = WatermarkConfig::new("SAMPLE").with_opacity(0.0);

    let result = ctx.watermark_processor().apply(&photo, &config).unwrap();
    assert_eq!(result, photo.to_rgba8());
}

#[test]
fn test_full_opacity_paints_fill_color() {
    let black = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 300, Rgb([0, 0, 0])));
    let config = WatermarkConfig::new("SAMPLE").with_opacity(1.0).with_density(30);

    let fonts = FontLibrary::new(false);
    let plan = GeometryPlan::plan(300, 300, None).unwrap();
    let font = resolve_font(&[], plan.font_size, &fonts).font;
    let canvas = render_pattern(
        &config.text,
        &font,
        plan.canvas_size(),
        config.density,
        text_fill(config.fill_alpha()),
    )
    .unwrap();
    let overlay = rotate_and_crop(&canvas, &plan, WATERMARK_ANGLE_DEGREES).unwrap();

    let result = apply_with_font(&black, &config, &plan, &font).unwrap();
    assert_eq!(result, composite(&black, &overlay).unwrap());

    for (out, over) in result.pixels().zip(overlay.pixels()) {
        if over[3] == 255 {
            assert_eq!(out.0, [over[0], over[1], over[2], 255]);
        }
    }
    assert!(result.pixels().any(|p| p[0] > 0), "no text was drawn");
    assert!(result.pixels().any(|p| p.0 == [0, 0, 0, 255]));
}

#[test]
fn test_transparent_input_stays_transparent_in_png() {
    let ctx = test_context();
    let data = create_test_png_with_alpha(120, 80);
    let output = watermark(
        &ctx,
        ImageInput::new("logo.png", &data),
        &WatermarkRequest::new("X", "png").with_opacity(0.0),
    )
    .unwrap();

    let marked = decode(&output.data).to_rgba8();
    assert_eq!(marked.get_pixel(0, 0)[3], 0);
    assert_eq!(marked.get_pixel(119, 0)[3], 255);
}

#[test]
fn test_jpeg_output_flattens_onto_white() {
    let ctx = test_context();
    let data = create_test_png_with_alpha(120, 80);
    let output = watermark(
        &ctx,
        ImageInput::new("logo.png", &data),
        &WatermarkRequest::new("X", "jpg").with_opacity(0.0).with_quality(100),
    )
    .unwrap();

    assert_eq!(output.filename, "logo_watermarked.jpg");
    let marked = decode(&output.data).to_rgb8();
    let corner = marked.get_pixel(2, 2);
    assert!(corner.0.iter().all(|&c| c >= 245), "corner was {:?}", corner);
}

#[test]
fn test_denser_layout_never_has_fewer_tiles() {
    let fonts = FontLibrary::new(false);
    let plan = GeometryPlan::plan(800, 800, None).unwrap();
    let font = resolve_font(&[], plan.font_size, &fonts).font;
    let text_size = font.measure("SAMPLE");

    let sparse = TileLayout::new(text_size, plan.canvas_size(), 1).unwrap();
    let dense = TileLayout::new(text_size, plan.canvas_size(), 50).unwrap();
    assert!(dense.tile_count() >= sparse.tile_count());

    let mut previous = 0;
    for density in 1..=50 {
        let count = TileLayout::new(text_size, plan.canvas_size(), density)
            .unwrap()
            .tile_count();
        assert!(count >= previous, "density {} had fewer tiles", density);
        previous = count;
    }
}

#[test]
fn test_processor_is_shareable_across_threads() {
    let fonts = FontLibrary::new(false);
    let candidates: Vec<String> = vec!["/nonexistent/font.ttf".to_string()];
    let processor = WatermarkProcessor::new(&fonts, &candidates);
    let photo = create_test_photo(64, 64);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let photo = &photo;
                scope.spawn(move || {
                    let config = WatermarkConfig::new(format!("T{}", i));
                    processor.apply(photo, &config).unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().dimensions(), (64, 64));
        }
    });
}

#[test]
fn test_validation_happens_before_decode() {
    let ctx = test_context();
    let garbage = b"definitely not an image";

    for request in [
        WatermarkRequest::new("SAMPLE", "png").with_opacity(1.5),
        WatermarkRequest::new("SAMPLE", "png").with_density(0),
    ] {
        let err = watermark(&ctx, ImageInput::new("photo.jpg", garbage), &request).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    let err = watermark(
        &ctx,
        ImageInput::new("photo.jpg", garbage),
        &WatermarkRequest::new("SAMPLE", "png"),
    )
    .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Decode);
}
