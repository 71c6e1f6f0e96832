use serde_json::Value as JsonValue;

use crate::data::model::TypedTable;

/// Rows included in the digest sample.
pub const SAMPLE_ROWS: usize = 3;

/// The bounded slice of a table that is sent to the insight service.
#[derive(Debug, Clone, PartialEq)]
pub struct DataDigest {
    pub columns: Vec<String>,
    pub row_count: usize,
    /// First rows as JSON objects keyed in header order.
    pub sample: Vec<JsonValue>,
}

impl DataDigest {
    pub fn from_table(table: &TypedTable) -> Self {
        DataDigest {
            columns: table.headers.clone(),
            row_count: table.rows.len(),
            sample: table
                .head(SAMPLE_ROWS)
                .iter()
                .map(|row| table.row_to_json(row))
                .collect(),
        }
    }

    pub fn sample_json(&self) -> String {
        serde_json::to_string(&self.sample).unwrap_or_else(|_| "[]".to_string())
    }

    /// Build the single user prompt asking for an insight object.
    pub fn to_prompt(&self) -> String {
        format!(
            r#"Analyze this dataset and return ONLY valid JSON (no markdown):

{{
  "summary": "brief overview of the data",
  "key_findings": ["finding 1", "finding 2", "finding 3"],
  "patterns": ["pattern 1", "pattern 2"],
  "recommendations": ["recommendation 1", "recommendation 2"],
  "data_quality": "excellent/good/fair/poor",
  "interesting_columns": ["col1", "col2"]
}}

Dataset info:
Columns: {columns}
Rows: {rows}
Sample data: {sample}"#,
            columns = self.columns.join(", "),
            rows = self.row_count,
            sample = self.sample_json(),
        )
    }
}
