/// Insight acquisition: digest → prompt → service → parsed insight.
///
/// ```text
///   TypedTable ──► DataDigest ──► prompt ──► InsightService ──► text blocks
///                                                                   │
///                                    Insight ◄── parse ◄── strip fences
///                                       ▲
///        any failure ──► InsightRequest::fallback
/// ```
///
/// Acquisition never fails from the caller's point of view.

pub mod client;
pub mod digest;
pub mod model;

use crate::data::model::TypedTable;
use crate::error::InsightAcquisitionError;

use client::{InsightService, parse_insight};
use digest::DataDigest;
use model::Insight;

/// Everything a worker thread needs for one acquisition, taken from the
/// table on the UI thread so the table itself never leaves it.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightRequest {
    pub prompt: String,
    /// Answer used when the service fails.
    pub fallback: Insight,
}

impl InsightRequest {
    pub fn from_table(table: &TypedTable) -> Self {
        InsightRequest {
            prompt: DataDigest::from_table(table).to_prompt(),
            fallback: Insight::fallback(table),
        }
    }
}

/// Ask the service for an insight, substituting the fallback on any failure.
pub fn acquire_insight(service: &dyn InsightService, request: &InsightRequest) -> Insight {
    match try_acquire(service, request) {
        Ok(insight) => {
            log::info!(
                "Insight received ({} findings, quality {:?})",
                insight.key_findings.len(),
                insight.data_quality
            );
            insight
        }
        Err(e) => {
            log::warn!("Insight service failed, using fallback: {e}");
            request.fallback.clone()
        }
    }
}

/// One request/parse attempt, surfacing the failure.
pub fn try_acquire(
    service: &dyn InsightService,
    request: &InsightRequest,
) -> Result<Insight, InsightAcquisitionError> {
    let response = service.complete(&request.prompt)?;
    parse_insight(&response.joined_text())
}

#[cfg(test)]
mod tests {
    use super::client::{ContentBlock, MessagesResponse};
    use super::*;
    use crate::data::loader::ingest;
    use std::sync::Mutex;

    /// Replays a canned result and records the prompts it was given.
    struct FakeService {
        reply: fn() -> Result<MessagesResponse, InsightAcquisitionError>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeService {
        fn new(reply: fn() -> Result<MessagesResponse, InsightAcquisitionError>) -> Self {
            Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl InsightService for FakeService {
        fn complete(&self, prompt: &str) -> Result<MessagesResponse, InsightAcquisitionError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            (self.reply)()
        }
    }

    fn table() -> TypedTable {
        ingest("s.csv", "region,revenue\nnorth,10\nsouth,20\n").unwrap()
    }

    fn request() -> InsightRequest {
        InsightRequest::from_table(&table())
    }

    #[test]
    fn test_service_insight_is_used() {
        let service = FakeService::new(|| {
            Ok(MessagesResponse {
                content: vec![ContentBlock::text(
                    "```json\n{\"summary\":\"Two regions\",\"key_findings\":[\"south doubles north\"],\"patterns\":[],\"recommendations\":[\"collect more\"],\"data_quality\":\"fair\",\"interesting_columns\":[\"revenue\"]}\n```",
                )],
            })
        });
        let insight = acquire_insight(&service, &request());
        assert_eq!(insight.summary, "Two regions");
        assert_eq!(insight.data_quality, "fair");
        assert_eq!(insight.interesting_columns, vec!["revenue"]);

        let prompts = service.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Columns: region, revenue"));
    }

    #[test]
    fn test_non_json_reply_falls_back() {
        let service = FakeService::new(|| {
            Ok(MessagesResponse {
                content: vec![ContentBlock::text("I think your data looks great!")],
            })
        });
        let insight = acquire_insight(&service, &request());
        assert_eq!(insight, Insight::fallback(&table()));
        assert_eq!(insight.data_quality, "good");
    }

    #[test]
    fn test_incomplete_json_falls_back() {
        let service = FakeService::new(|| {
            Ok(MessagesResponse {
                content: vec![ContentBlock::text(r#"{"summary":"partial"}"#)],
            })
        });
        assert_eq!(acquire_insight(&service, &request()), Insight::fallback(&table()));
    }

    #[test]
    fn test_transport_failure_falls_back() {
        let service = FakeService::new(|| Err(InsightAcquisitionError::Timeout));
        let req = request();
        assert!(try_acquire(&service, &req).is_err());
        assert_eq!(acquire_insight(&service, &req), Insight::fallback(&table()));
    }

    #[test]
    fn test_each_invocation_is_independent() {
        let service = FakeService::new(|| {
            Err(InsightAcquisitionError::Status {
                status: 503,
                body: String::new(),
            })
        });
        let req = request();
        let first = acquire_insight(&service, &req);
        let second = acquire_insight(&service, &req);
        assert_eq!(first, second);
        assert_eq!(service.prompts.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_request_carries_digest_prompt_and_fallback() {
        let t = table();
        let req = InsightRequest::from_table(&t);
        assert_eq!(req.prompt, DataDigest::from_table(&t).to_prompt());
        assert!(req.prompt.contains(r#"{"region":"north","revenue":10}"#));
        assert_eq!(req.fallback, Insight::fallback(&t));
    }
}
