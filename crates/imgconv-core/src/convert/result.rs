//! Conversion output and the size/name arithmetic shared by both strategies.

use base64::Engine as _;
use std::fmt;
use std::sync::Arc;

use crate::format::TargetFormat;
use crate::record::FileRecord;

/// Which strategy produced a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionMethod {
    Local,
    /// Remote endpoint, with the server's own label when it sent one.
    Remote(Option<String>),
}

impl fmt::Display for ConversionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionMethod::Local => write!(f, "local"),
            ConversionMethod::Remote(None) => write!(f, "remote"),
            ConversionMethod::Remote(Some(label)) => write!(f, "remote ({})", label),
        }
    }
}

/// Successful conversion of one record.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub original_size: u64,
    pub converted_size: u64,
    /// Positive when the file shrank, negative when it grew.
    pub reduction_percentage: f64,
    pub encoded: Arc<[u8]>,
    pub output_file_name: String,
    pub format: TargetFormat,
    pub method: ConversionMethod,
}

impl ConversionResult {
    /// Builds a result from raw encoded bytes; sizes are measured, never taken on trust.
    pub fn from_encoded(
        record: &FileRecord,
        format: TargetFormat,
        encoded: Vec<u8>,
        method: ConversionMethod,
    ) -> Self {
        let original_size = record.original_size();
        let converted_size = encoded.len() as u64;
        Self {
            original_size,
            converted_size,
            reduction_percentage: reduction_percentage(original_size, converted_size),
            encoded: Arc::from(encoded),
            output_file_name: output_file_name(record.original_name(), format),
            format,
            method,
        }
    }

    /// `data:` URL of the converted bytes, for previews.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            base64::engine::general_purpose::STANDARD.encode(&self.encoded)
        )
    }
}

/// `(original - converted) / original * 100`, rounded to two decimals. Zero for an empty original.
pub fn reduction_percentage(original: u64, converted: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    let pct = (original as f64 - converted as f64) / original as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Replaces the extension of `original` with the format's extension.
///
/// A leading dot is part of the stem, not an extension: `.hidden` becomes
/// `.hidden.webp`, never a bare `.webp`. An empty name becomes `image.<ext>`.
pub fn output_file_name(original: &str, format: TargetFormat) -> String {
    let stem = match original.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => original,
    };
    let stem = if stem.is_empty() { "image" } else { stem };
    format!("{}.{}", stem, format.extension())
}
