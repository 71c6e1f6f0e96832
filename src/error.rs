use thiserror::Error;

// ---------------------------------------------------------------------------
// Ingestion errors
// ---------------------------------------------------------------------------

/// Why an uploaded file could not be turned into a table.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported file type: {0} (expected .csv or .json)")]
    UnsupportedFormat(String),

    #[error("Could not parse {format}: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error("File is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("Reading file failed: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestError {
    pub fn csv(message: impl Into<String>) -> Self {
        IngestError::Parse {
            format: "CSV",
            message: message.into(),
        }
    }

    pub fn json(message: impl Into<String>) -> Self {
        IngestError::Parse {
            format: "JSON",
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Insight acquisition errors
// ---------------------------------------------------------------------------

/// Any failure while asking the insight service. Never shown to the user:
/// the caller substitutes the fallback insight.
#[derive(Debug, Error)]
pub enum InsightAcquisitionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for InsightAcquisitionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            InsightAcquisitionError::Timeout
        } else if e.is_decode() {
            InsightAcquisitionError::Malformed(e.to_string())
        } else {
            InsightAcquisitionError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for InsightAcquisitionError {
    fn from(e: serde_json::Error) -> Self {
        InsightAcquisitionError::Malformed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_error_messages() {
        let err = IngestError::UnsupportedFormat("data.xlsx".into());
        assert!(err.to_string().contains("data.xlsx"));

        let err = IngestError::json("expected value at line 1");
        assert_eq!(
            err.to_string(),
            "Could not parse JSON: expected value at line 1"
        );
    }

    #[test]
    fn test_serde_error_is_malformed() {
        let err: InsightAcquisitionError = serde_json::from_str::<serde_json::Value>("{oops")
            .map_err(InsightAcquisitionError::from)
            .unwrap_err();
        assert!(matches!(err, InsightAcquisitionError::Malformed(_)));
    }
}
