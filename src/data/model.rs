use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, Serializer};
use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// CellValue – a single cell in a row
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value produced by ingestion.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Finite 64-bit float.
    Number(f64),
    Text(String),
    /// Explicit JSON `null`.
    Null,
    /// The source record had no value for this header (short CSV line, or a
    /// JSON record lacking the key). Displays as `undefined`.
    Missing,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Null => write!(f, "null"),
            CellValue::Missing => write!(f, "undefined"),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Number(v) => match as_integral(*v) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*v),
            },
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Null | CellValue::Missing => serializer.serialize_unit(),
        }
    }
}

impl CellValue {
    /// Classify a raw text field: numeric iff the trimmed text is non-empty
    /// and parses in full as a finite float, otherwise the trimmed text.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        match parse_finite(trimmed) {
            Some(v) => CellValue::Number(v),
            None => CellValue::Text(trimmed.to_string()),
        }
    }

    /// Convert a JSON scalar or container into a cell.
    ///
    /// Strings are kept verbatim, so `"5"` stays text. Booleans become their
    /// textual form and nested values their compact JSON text.
    pub fn from_json(val: &JsonValue) -> Self {
        match val {
            JsonValue::Number(n) => match n.as_f64() {
                Some(f) if f.is_finite() => CellValue::Number(f),
                _ => CellValue::Text(n.to_string()),
            },
            JsonValue::String(s) => CellValue::Text(s.clone()),
            JsonValue::Bool(b) => CellValue::Text(b.to_string()),
            JsonValue::Null => CellValue::Null,
            other => CellValue::Text(other.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Number(_))
    }
}

/// Whole numbers print without a fraction (`700000`, not `700000.0`).
fn as_integral(v: f64) -> Option<i64> {
    const LIMIT: f64 = 9_007_199_254_740_992.0; // 2^53
    (v.fract() == 0.0 && v.abs() <= LIMIT).then_some(v as i64)
}

fn parse_finite(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Row / TypedTable
// ---------------------------------------------------------------------------

/// One record: header → value. Duplicate headers share a single slot.
pub type Row = BTreeMap<String, CellValue>;

/// The typed row set produced by ingestion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedTable {
    /// Column names in source order.
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl TypedTable {
    /// Value of `header` in `row`, `Missing` when absent.
    pub fn cell<'a>(&self, row: &'a Row, header: &str) -> &'a CellValue {
        static MISSING: CellValue = CellValue::Missing;
        row.get(header).unwrap_or(&MISSING)
    }

    /// First `n` rows (fewer if the table is shorter).
    pub fn head(&self, n: usize) -> &[Row] {
        &self.rows[..self.rows.len().min(n)]
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render a row as a JSON object keyed in header order, omitting missing
    /// cells.
    pub fn row_to_json(&self, row: &Row) -> JsonValue {
        let mut obj = serde_json::Map::new();
        for header in &self.headers {
            let value = self.cell(row, header);
            if *value == CellValue::Missing {
                continue;
            }
            let json = match serde_json::to_value(value) {
                Ok(v) => v,
                Err(_) => JsonValue::Null,
            };
            obj.insert(header.clone(), json);
        }
        JsonValue::Object(obj)
    }
}
