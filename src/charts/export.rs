//! Data and image export for the chart dashboard.
//!
//! Records are exported in their wire shape: the CSV header is the key list of
//! the first record, the JSON file is the pretty-printed array.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::common::{Download, DownloadBody};
use crate::error::{AppError, AppResult};

pub const DATA_FILE_STEM: &str = "air_quality_data";
pub const DEFAULT_IMAGE_FILENAME: &str = "chart.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv;charset=utf-8",
            Self::Json => "application/json",
        }
    }

    #[must_use]
    pub fn filename(self) -> String {
        format!("{DATA_FILE_STEM}.{}", self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(AppError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Serialize `records` into the file handed to the download sink.
///
/// # Errors
///
/// Returns an error if the records cannot be serialized.
pub fn build_download<T: Serialize>(format: ExportFormat, records: &[T]) -> AppResult<Download> {
    let content = match format {
        ExportFormat::Csv => export_to_csv(records)?,
        ExportFormat::Json => export_to_json(records)?,
    };

    Ok(Download {
        filename: format.filename(),
        body: DownloadBody::Blob {
            content_type: format.content_type(),
            bytes: content.into_bytes(),
        },
    })
}

/// CSV with a bare header row and every data field double-quoted.
///
/// Falsy values (missing, null, `false`, `0` and empty strings) become `""`.
/// Rows are separated by `\n` with no trailing newline.
///
/// # Errors
///
/// Returns `AppError::Export` if a record does not serialize to a JSON object.
pub fn export_to_csv<T: Serialize>(records: &[T]) -> AppResult<String> {
    let rows = records
        .iter()
        .map(|record| -> AppResult<Map<String, Value>> {
            match serde_json::to_value(record)? {
                Value::Object(map) => Ok(map),
                other => Err(AppError::Export(format!(
                    "expected an object record, got {other}"
                ))),
            }
        })
        .collect::<AppResult<Vec<_>>>()?;

    let Some(first) = rows.first() else {
        return Ok(String::new());
    };
    let headers: Vec<&str> = first.keys().map(String::as_str).collect();

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in &rows {
        writer.write_record(headers.iter().map(|h| csv_field(row.get(*h))))?;
    }

    let body = writer
        .into_inner()
        .map_err(|e| AppError::Export(format!("failed to flush CSV: {e}")))?;
    let body = String::from_utf8(body).map_err(|e| AppError::Export(e.to_string()))?;

    let mut out = headers.join(",");
    out.push('\n');
    out.push_str(body.trim_end_matches('\n'));
    Ok(out)
}

fn csv_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null | Value::Bool(false)) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(true)) => "true".to_string(),
        // Falsy numbers render blank like every other falsy value
        Some(Value::Number(n)) if n.as_f64().is_none_or(|v| v == 0.0 || v.is_nan()) => {
            String::new()
        }
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Pretty-printed JSON array, two-space indent.
///
/// # Errors
///
/// Returns `AppError::Json` if serialization fails.
pub fn export_to_json<T: Serialize>(records: &[T]) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

#[must_use]
pub fn png_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}
