// Configuration unit tests

use imagepress::config::*;
use imagepress::context::ServiceContext;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_minimal_yaml_uses_defaults() {
    let config: Config = serde_yaml::from_str("service: {}").expect("Failed to deserialize YAML");
    assert_eq!(config.service.name, "imagepress");
    assert_eq!(config.image.default_quality, 85);
    assert_eq!(config.watermark.default_opacity, 0.5);
    assert_eq!(config.watermark.default_density, 15);
    assert!(!config.watermark.font_candidates.is_empty());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_env_substitution() {
    std::env::set_var("IMAGEPRESS_TEST_STATUS", "all good");
    let yaml = r#"
service:
  status_message: "${IMAGEPRESS_TEST_STATUS}"
"#;
    let config = Config::from_yaml_with_env(yaml).unwrap();
    assert_eq!(config.service.status_message, "all good");
}

#[test]
fn test_missing_env_var_is_an_error() {
    let yaml = r#"
service:
  name: "${IMAGEPRESS_TEST_DEFINITELY_UNSET}"
"#;
    let err = Config::from_yaml_with_env(yaml).unwrap_err();
    assert!(err.contains("IMAGEPRESS_TEST_DEFINITELY_UNSET"));
}

#[test]
fn test_validation_catches_bad_defaults() {
    let yaml = r#"
watermark:
  default_density: 99
"#;
    let config = Config::from_yaml_with_env(yaml).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.starts_with("watermark:"));

    let config = Config::from_yaml_with_env("image:\n  default_quality: 0\n").unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_file_config_drives_the_context() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
service:
  status_message: "ready"
image:
  default_quality: 42
watermark:
  default_opacity: 0.25
  load_system_fonts: false
"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    config.validate().unwrap();
    let ctx = ServiceContext::new(config);

    assert_eq!(ctx.default_quality(), 42);
    assert_eq!(ctx.config().watermark.default_opacity, 0.25);
    assert_eq!(imagepress::operations::status(&ctx).message, "ready");
}

#[test]
fn test_missing_file() {
    let err = Config::from_file("/nonexistent/imagepress.yaml").unwrap_err();
    assert!(err.contains("Failed to read config file"));
}
