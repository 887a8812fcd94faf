//! Image description and EXIF fields.

use std::collections::BTreeMap;
use std::io::Cursor;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use super::{decode_input, ImageInput};
use crate::codec::png_chunks;
use crate::context::ServiceContext;
use crate::error::ServiceError;

const BINARY_PLACEHOLDER: &str = "binary data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetadataReport {
    pub filename: String,
    pub format: String,
    pub mode: &'static str,
    pub size: ImageSize,
    /// Textual container properties (PNG text chunks, gamma)
    pub info: BTreeMap<String, JsonValue>,
    /// EXIF fields of the primary image, keyed by tag name
    pub exif: BTreeMap<String, JsonValue>,
}

pub fn metadata(
    ctx: &ServiceContext,
    input: ImageInput<'_>,
) -> Result<MetadataReport, ServiceError> {
    let decoded = decode_input(ctx, &input)?;

    let report = MetadataReport {
        filename: input.filename.to_string(),
        format: decoded.format_name(),
        mode: decoded.mode.label(),
        size: ImageSize {
            width: decoded.width(),
            height: decoded.height(),
        },
        info: container_info(input.data),
        exif: exif_fields(input.data),
    };

    info!(
        operation = "metadata",
        filename = input.filename,
        info_entries = report.info.len(),
        exif_fields = report.exif.len(),
        "Operation completed"
    );
    Ok(report)
}

/// PNG `tEXt` entries and `gAMA`. Other containers report nothing.
fn container_info(data: &[u8]) -> BTreeMap<String, JsonValue> {
    let mut info = BTreeMap::new();
    for (kind, body) in png_chunks(data) {
        match &kind {
            b"tEXt" => {
                if let Some(nul) = body.iter().position(|&b| b == 0) {
                    info.insert(latin1(&body[..nul]), JsonValue::from(latin1(&body[nul + 1..])));
                }
            }
            b"gAMA" if body.len() == 4 => {
                let raw = u32::from_be_bytes([body[0], body[1], body[2], body[3]]);
                info.insert("gamma".to_string(), JsonValue::from(raw as f64 / 100_000.0));
            }
            b"IEND" => break,
            _ => {}
        }
    }
    info
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Primary-image EXIF fields. Missing or malformed EXIF yields an empty map.
fn exif_fields(data: &[u8]) -> BTreeMap<String, JsonValue> {
    let exif = match exif::Reader::new().read_from_container(&mut Cursor::new(data)) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return BTreeMap::new(),
        Err(e) => {
            debug!(error = %e, "Ignoring unreadable EXIF block");
            return BTreeMap::new();
        }
    };

    exif.fields()
        .filter(|field| field.ifd_num == exif::In::PRIMARY)
        .map(|field| (field.tag.to_string(), exif_value(field)))
        .collect()
}

fn exif_value(field: &exif::Field) -> JsonValue {
    use exif::Value;

    fn numbers<T: Copy + Into<JsonValue>>(values: &[T]) -> JsonValue {
        match values {
            [single] => (*single).into(),
            many => JsonValue::Array(many.iter().map(|&v| v.into()).collect()),
        }
    }

    match &field.value {
        Value::Byte(_) | Value::Undefined(..) => JsonValue::from(BINARY_PLACEHOLDER),
        Value::Ascii(parts) => {
            let text: Vec<String> = parts
                .iter()
                .map(|part| String::from_utf8_lossy(part).trim_end_matches('\0').to_string())
                .collect();
            JsonValue::from(text.join(", "))
        }
        Value::Short(values) => numbers(values),
        Value::Long(values) => numbers(values),
        Value::SShort(values) => numbers(values),
        Value::SLong(values) => numbers(values),
        _ => JsonValue::from(field.display_value().to_string()),
    }
}
