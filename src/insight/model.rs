use serde::{Deserialize, Serialize};

use crate::data::model::TypedTable;

/// Structured analysis shown in the insights panel.
///
/// Every field is required when parsing a service response; a reply missing
/// any of them is treated as malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub summary: String,
    pub key_findings: Vec<String>,
    pub patterns: Vec<String>,
    pub recommendations: Vec<String>,
    /// Expected to be one of `excellent|good|fair|poor`, but kept as the raw
    /// string the service returned.
    pub data_quality: String,
    pub interesting_columns: Vec<String>,
}

/// Recognised `data_quality` grades, used for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl DataQuality {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "excellent" => Some(DataQuality::Excellent),
            "good" => Some(DataQuality::Good),
            "fair" => Some(DataQuality::Fair),
            "poor" => Some(DataQuality::Poor),
            _ => None,
        }
    }
}

impl Insight {
    pub fn quality(&self) -> Option<DataQuality> {
        DataQuality::parse(&self.data_quality)
    }

    /// Locally synthesised insight used whenever the service cannot be
    /// reached or its answer cannot be parsed.
    pub fn fallback(table: &TypedTable) -> Self {
        Insight {
            summary: format!(
                "Dataset loaded successfully with {} records",
                table.rows.len()
            ),
            key_findings: vec![
                "Multiple data columns detected".to_string(),
                "Numeric and categorical data present".to_string(),
                "Ready for visualization".to_string(),
            ],
            patterns: vec![
                "Data appears structured".to_string(),
                "No major anomalies detected".to_string(),
            ],
            recommendations: vec![
                "Explore correlations".to_string(),
                "Check for outliers".to_string(),
            ],
            data_quality: "good".to_string(),
            interesting_columns: table.headers.iter().take(3).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::ingest;

    #[test]
    fn test_fallback_contents() {
        let table = ingest("f.csv", "a,b,c,d\n1,2,3,4\n5,6,7,8\n").unwrap();
        let insight = Insight::fallback(&table);
        assert_eq!(insight.summary, "Dataset loaded successfully with 2 records");
        assert_eq!(insight.key_findings.len(), 3);
        assert_eq!(insight.patterns.len(), 2);
        assert_eq!(insight.recommendations.len(), 2);
        assert_eq!(insight.data_quality, "good");
        assert_eq!(insight.interesting_columns, vec!["a", "b", "c"]);
        assert_eq!(insight.quality(), Some(DataQuality::Good));
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let table = ingest("f.json", r#"[{"x":1},{"x":2}]"#).unwrap();
        let a = serde_json::to_string(&Insight::fallback(&table)).unwrap();
        let b = serde_json::to_string(&Insight::fallback(&table)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fallback_with_few_columns() {
        let table = ingest("f.csv", "only\n").unwrap();
        let insight = Insight::fallback(&table);
        assert_eq!(insight.interesting_columns, vec!["only"]);
        assert_eq!(insight.summary, "Dataset loaded successfully with 0 records");
    }

    #[test]
    fn test_data_quality_parse() {
        assert_eq!(DataQuality::parse(" Excellent "), Some(DataQuality::Excellent));
        assert_eq!(DataQuality::parse("poor"), Some(DataQuality::Poor));
        assert_eq!(DataQuality::parse("excellent/good"), None);
    }

    #[test]
    fn test_missing_field_fails_to_parse() {
        let json = r#"{"summary":"s","key_findings":[],"patterns":[],"recommendations":[],"data_quality":"fair"}"#;
        assert!(serde_json::from_str::<Insight>(json).is_err());
    }
}
