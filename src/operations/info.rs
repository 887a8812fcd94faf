//! Size report: the original image against every output format.

use rayon::prelude::*;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{info as log_info, warn};

use super::{decode_input, rejected, resolve_quality, ImageInput};
use crate::codec::{encode, OutputFormat};
use crate::constants::INFO_REPORT_FORMATS;
use crate::context::ServiceContext;
use crate::error::ServiceError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InfoRequest {
    #[serde(default)]
    pub quality: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageReport {
    pub size_bytes: usize,
    pub size_human: String,
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub mode: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Savings {
    /// Negative when the encoded image is larger than the original
    pub bytes: i64,
    pub percentage: String,
}

impl Savings {
    pub fn between(original: usize, encoded: usize) -> Self {
        let bytes = original as i64 - encoded as i64;
        let percentage = if original == 0 {
            0.0
        } else {
            bytes as f64 / original as f64 * 100.0
        };
        Self {
            bytes,
            percentage: format!("{:.2}%", percentage),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormatReport {
    Encoded {
        quality: u8,
        size_bytes: usize,
        size_human: String,
        savings: Savings,
    },
    Failed {
        error: String,
    },
}

impl FormatReport {
    pub fn size_bytes(&self) -> Option<usize> {
        match self {
            FormatReport::Encoded { size_bytes, .. } => Some(*size_bytes),
            FormatReport::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InfoReport {
    pub original: ImageReport,
    #[serde(serialize_with = "ordered_map")]
    pub formats: Vec<(&'static str, FormatReport)>,
}

impl InfoReport {
    pub fn format(&self, name: &str) -> Option<&FormatReport> {
        self.formats
            .iter()
            .find(|(label, _)| *label == name)
            .map(|(_, report)| report)
    }
}

fn ordered_map<S: Serializer>(
    entries: &[(&'static str, FormatReport)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(entries.iter().map(|(k, v)| (k, v)))
}

/// `"{:.2} KB"` of `bytes / 1024`
pub fn human_size(bytes: usize) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

/// Encode the image once per report format, in parallel, and compare sizes
/// with the uploaded bytes.
///
/// A format that fails to encode is reported with its error; the report as a
/// whole still succeeds.
pub fn info(
    ctx: &ServiceContext,
    input: ImageInput<'_>,
    request: &InfoRequest,
) -> Result<InfoReport, ServiceError> {
    let quality = resolve_quality(request.quality, ctx.default_quality())
        .map_err(|e| rejected("info", e))?;

    let decoded = decode_input(ctx, &input)?;
    let original_size = input.data.len();
    let settings = ctx.encoder_settings();

    let formats: Vec<(&'static str, FormatReport)> = INFO_REPORT_FORMATS
        .par_iter()
        .map(|&label| {
            let report = label
                .parse::<OutputFormat>()
                .and_then(|format| encode(&decoded.image, format, quality, &settings));
            let report = match report {
                Ok(encoded) => FormatReport::Encoded {
                    quality,
                    size_bytes: encoded.data.len(),
                    size_human: human_size(encoded.data.len()),
                    savings: Savings::between(original_size, encoded.data.len()),
                },
                Err(e) => {
                    warn!(format = label, error = %e, "Format failed in size report");
                    FormatReport::Failed {
                        error: e.to_string(),
                    }
                }
            };
            (label, report)
        })
        .collect();

    log_info!(
        operation = "info",
        filename = input.filename,
        width = decoded.width(),
        height = decoded.height(),
        bytes = original_size,
        "Operation completed"
    );

    Ok(InfoReport {
        original: ImageReport {
            size_bytes: original_size,
            size_human: human_size(original_size),
            format: decoded.format_name(),
            width: decoded.width(),
            height: decoded.height(),
            mode: decoded.mode.label(),
        },
        formats,
    })
}
