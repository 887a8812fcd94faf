// Error handling unit tests

use imagepress::codec::ImageError;
use imagepress::watermark::WatermarkError;
use imagepress::{ErrorCategory, ServiceError};

#[test]
fn test_every_category_has_a_status() {
    let cases = [
        (ServiceError::validation("bad"), 400),
        (ServiceError::Decode("bad".into()), 400),
        (ServiceError::FontLoad("bad".into()), 500),
        (ServiceError::Encode("bad".into()), 500),
        (ServiceError::Internal("bad".into()), 500),
    ];
    for (err, status) in cases {
        assert_eq!(err.to_http_status(), status, "{}", err);
    }
}

#[test]
fn test_lower_level_errors_convert() {
    let err: ServiceError = ImageError::decode_failed("truncated").into();
    assert_eq!(err.category(), ErrorCategory::Decode);

    let err: ServiceError = WatermarkError::RenderError("no metrics".into()).into();
    assert_eq!(err.category(), ErrorCategory::Internal);
    assert!(err.to_string().contains("no metrics"));
}

#[test]
fn test_errors_are_std_errors() {
    fn takes_error(_: &(dyn std::error::Error + Send + Sync)) {}
    takes_error(&ServiceError::validation("x"));
    takes_error(&ImageError::decode_failed("x"));
    takes_error(&WatermarkError::ConfigError("x".into()));
}
