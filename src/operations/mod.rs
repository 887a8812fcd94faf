//! Image operations.
//!
//! Each operation takes the service context, the uploaded image and a request
//! struct, validates the request BEFORE decoding, and returns either a
//! complete result or a [`ServiceError`]. Partial output is never returned.
//!
//! | operation   | output                               |
//! |-------------|--------------------------------------|
//! | `convert`   | `<base>.<format>`                    |
//! | `info`      | JSON size report for all formats     |
//! | `metadata`  | JSON description and EXIF fields     |
//! | `watermark` | `<base>_watermarked.<format>`        |
//! | `resize`    | `<base>_resized.<format>`            |
//! | `crop`      | `<base>_cropped.<format>`            |
//! | `status`    | service message and uptime           |

use image::DynamicImage;
use serde::Serialize;
use tracing::warn;

use crate::codec::{decode, encode, DecodedImage, OutputFormat};
use crate::constants::{MAX_QUALITY, MIN_QUALITY};
use crate::context::ServiceContext;
use crate::error::ServiceError;

pub mod convert;
pub mod crop;
pub mod info;
pub mod metadata;
pub mod resize;
pub mod status;
pub mod watermark;

pub use convert::{convert, ConvertRequest};
pub use crop::{crop, CropRequest};
pub use info::{human_size, info, FormatReport, ImageReport, InfoReport, InfoRequest, Savings};
pub use metadata::{metadata, ImageSize, MetadataReport};
pub use resize::{resize, target_dimensions, ResizeRequest};
pub use status::{status, StatusReport};
pub use watermark::{watermark, WatermarkRequest};

/// An uploaded image: the client's file name and the raw bytes.
#[derive(Debug, Clone, Copy)]
pub struct ImageInput<'a> {
    pub filename: &'a str,
    pub data: &'a [u8],
}

impl<'a> ImageInput<'a> {
    pub fn new(filename: &'a str, data: &'a [u8]) -> Self {
        Self { filename, data }
    }
}

/// An encoded image ready to hand back to the caller.
#[derive(Debug, Clone)]
pub struct OperationOutput {
    pub data: Vec<u8>,
    pub content_type: &'static str,
    /// Suggested download name
    pub filename: String,
    pub width: u32,
    pub height: u32,
}

/// Requested output format, keeping the caller's spelling for file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatChoice {
    pub format: OutputFormat,
    /// Lower-cased name as requested ("jpg", "jpeg", "png", ...)
    pub label: String,
}

/// Parse "avif", "webp", "png", "jpg" or "jpeg", case-insensitively.
pub fn parse_format(requested: &str) -> Result<FormatChoice, ServiceError> {
    let format: OutputFormat = requested.parse()?;
    Ok(FormatChoice {
        format,
        label: requested.trim().to_lowercase(),
    })
}

/// Quality to use: the requested value, or the configured default.
pub fn resolve_quality(requested: Option<u32>, default: u8) -> Result<u8, ServiceError> {
    let quality = requested.unwrap_or(default as u32);
    if !(MIN_QUALITY as u32..=MAX_QUALITY as u32).contains(&quality) {
        return Err(ServiceError::validation(format!(
            "Quality must be between {} and {}, got {}",
            MIN_QUALITY, MAX_QUALITY, quality
        )));
    }
    Ok(quality as u8)
}

/// File name with its last extension removed (`"a.b.png"` → `"a.b"`).
///
/// Only the last path component is searched, and the dots that open it do
/// not start an extension (`".hidden"` and `"dir.d/file"` stay as is).
pub fn base_name(filename: &str) -> &str {
    let stem_start = filename.rfind(['/', '\\']).map_or(0, |sep| sep + 1);
    let component = &filename[stem_start..];
    let leading_dots = component.len() - component.trim_start_matches('.').len();
    match component.rfind('.') {
        Some(dot) if dot >= leading_dots => &filename[..stem_start + dot],
        _ => filename,
    }
}

/// `<base><suffix>.<label>`
pub fn output_filename(filename: &str, suffix: &str, label: &str) -> String {
    format!("{}{}.{}", base_name(filename), suffix, label)
}

/// Log a request rejected during validation and hand the error back.
pub(crate) fn rejected(operation: &'static str, err: ServiceError) -> ServiceError {
    warn!(operation, category = err.category().as_str(), error = %err, "Rejected request");
    err
}

pub(crate) fn decode_input(
    ctx: &ServiceContext,
    input: &ImageInput<'_>,
) -> Result<DecodedImage, ServiceError> {
    let decoded = decode(input.data, ctx.security())?;
    tracing::debug!(
        filename = input.filename,
        format = %decoded.format_name(),
        width = decoded.width(),
        height = decoded.height(),
        mode = decoded.mode.label(),
        "Decoded input"
    );
    Ok(decoded)
}

pub(crate) fn encode_output(
    ctx: &ServiceContext,
    image: &DynamicImage,
    choice: &FormatChoice,
    quality: u8,
    filename: String,
    operation: &'static str,
) -> Result<OperationOutput, ServiceError> {
    let encoded = encode(image, choice.format, quality, &ctx.encoder_settings())?;

    tracing::info!(
        operation,
        format = %choice.format,
        quality,
        width = image.width(),
        height = image.height(),
        bytes = encoded.data.len(),
        filename = %filename,
        "Operation completed"
    );

    Ok(OperationOutput {
        data: encoded.data,
        content_type: encoded.content_type,
        filename,
        width: image.width(),
        height: image.height(),
    })
}

/// Serialize a report for the caller.
pub fn to_json<T: Serialize>(report: &T) -> Result<String, ServiceError> {
    serde_json::to_string_pretty(report)
        .map_err(|e| ServiceError::Internal(format!("Failed to serialize report: {}", e)))
}
