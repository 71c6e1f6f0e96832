use std::path::Path;

use serde_json::Value as JsonValue;

use super::model::{CellValue, Row, TypedTable};
use crate::error::IngestError;

/// Default upload limit (10 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read a file from disk, enforce the size limit, and ingest it.
pub fn load_file(path: &Path, max_bytes: u64) -> Result<TypedTable, IngestError> {
    check_size(std::fs::metadata(path)?.len(), max_bytes)?;

    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    ingest_bytes(&filename, &bytes)
}

/// Ingest an in-memory upload (e.g. a dropped file) under the size limit.
pub fn ingest_bytes_limited(
    filename: &str,
    bytes: &[u8],
    max_bytes: u64,
) -> Result<TypedTable, IngestError> {
    check_size(bytes.len() as u64, max_bytes)?;
    ingest_bytes(filename, bytes)
}

/// Ingest raw upload bytes under their declared file name.
pub fn ingest_bytes(filename: &str, bytes: &[u8]) -> Result<TypedTable, IngestError> {
    let text = std::str::from_utf8(bytes).map_err(|e| IngestError::Parse {
        format: "text",
        message: format!("file is not valid UTF-8 ({e})"),
    })?;
    ingest(filename, text)
}

fn check_size(size: u64, limit: u64) -> Result<(), IngestError> {
    if size > limit {
        return Err(IngestError::TooLarge { size, limit });
    }
    Ok(())
}

/// Parse text into a [`TypedTable`].  Dispatch by file name suffix.
///
/// Supported formats:
/// * `.csv`  – header line plus comma-separated rows, no quoting
/// * `.json` – an array of records, or a single record
pub fn ingest(filename: &str, raw_text: &str) -> Result<TypedTable, IngestError> {
    let lower = filename.to_ascii_lowercase();

    if lower.ends_with(".csv") {
        parse_csv(raw_text)
    } else if lower.ends_with(".json") {
        parse_json(raw_text)
    } else {
        Err(IngestError::UnsupportedFormat(filename.to_string()))
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Layout: first non-blank line holds the headers, every other non-blank line
/// is a record.  Fields are split on `,` without quote handling, so a quoted
/// `"3,000"` lands in two columns.
fn parse_csv(text: &str) -> Result<TypedTable, IngestError> {
    let cleaned: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if cleaned.is_empty() {
        return Err(IngestError::csv("no header row found"));
    }
    let joined = cleaned.join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .quoting(false)
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_reader(joined.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::csv(format!("reading header row: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::with_capacity(cleaned.len() - 1);

    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| IngestError::csv(format!("row {}: {e}", row_no + 1)))?;

        let mut row = Row::new();
        for (col_idx, header) in headers.iter().enumerate() {
            let value = match record.get(col_idx) {
                Some(raw) => CellValue::from_raw(raw),
                None => CellValue::Missing,
            };
            row.insert(header.clone(), value);
        }
        rows.push(row);
    }

    Ok(TypedTable { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Expected shape (records-oriented):
///
/// ```json
/// [
///   { "region": "north", "revenue": 1200.5 },
///   { "region": "south", "revenue": 980 }
/// ]
/// ```
///
/// A bare object is treated as a one-record array.  Headers come from the
/// first record only.
fn parse_json(text: &str) -> Result<TypedTable, IngestError> {
    let root: JsonValue =
        serde_json::from_str(text).map_err(|e| IngestError::json(e.to_string()))?;

    let records = match root {
        JsonValue::Array(items) => items,
        other => vec![other],
    };

    let headers: Vec<String> = records
        .first()
        .and_then(|first| first.as_object())
        .map(|obj| obj.keys().cloned().collect())
        .unwrap_or_default();

    let rows = records
        .iter()
        .map(|rec| {
            let obj = rec.as_object();
            headers
                .iter()
                .map(|h| {
                    let value = obj
                        .and_then(|o| o.get(h))
                        .map(CellValue::from_json)
                        .unwrap_or(CellValue::Missing);
                    (h.clone(), value)
                })
                .collect::<Row>()
        })
        .collect();

    Ok(TypedTable { headers, rows })
}
