// Insight service client
//
// Sends one prompt to a messages-style text-generation endpoint and hands the
// raw content blocks back. Parsing the reply into an `Insight` lives here too
// so the acquisition logic can be exercised with a fake service.

use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use super::model::Insight;
use crate::config::InsightConfig;
use crate::error::InsightAcquisitionError;

/// Header value sent with direct (non-proxied) requests.
const API_VERSION: &str = "2023-06-01";

/// Longest error body kept in an `InsightAcquisitionError::Status`.
const MAX_ERROR_BODY: usize = 512;

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body: `{ "content": [{ "type": "text", "text": "..." }, ...] }`
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[cfg(test)]
impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock {
            kind: "text".to_string(),
            text: Some(text.into()),
        }
    }
}

impl MessagesResponse {
    /// Concatenate every `text` block in order, skipping other block kinds.
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect()
    }
}

// ============================================================================
// Service seam
// ============================================================================

/// Anything that can answer a prompt with content blocks.
///
/// Implementations block; callers run them off the UI thread.
pub trait InsightService: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<MessagesResponse, InsightAcquisitionError>;
}

/// Blocking HTTP client for the configured endpoint.
pub struct MessagesClient {
    http: reqwest::blocking::Client,
    config: InsightConfig,
}

impl MessagesClient {
    pub fn new(config: InsightConfig) -> Result<Self, InsightAcquisitionError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

impl InsightService for MessagesClient {
    fn complete(&self, prompt: &str) -> Result<MessagesResponse, InsightAcquisitionError> {
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![RequestMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut request = self
            .http
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&body);

        if let Some(key) = &self.config.api_key {
            request = request
                .header("x-api-key", key)
                .header("anthropic-version", API_VERSION);
        }

        log::debug!(
            "POST {} (model {}, {} prompt bytes)",
            self.config.endpoint,
            self.config.model,
            prompt.len()
        );

        let response = request.send()?;
        let status = response.status();

        if !status.is_success() {
            let mut body = response.text().unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(InsightAcquisitionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text()?;
        Ok(serde_json::from_str(&text)?)
    }
}

// ============================================================================
// Reply parsing
// ============================================================================

/// Remove Markdown code-fence delimiters (```` ```json ```` and ```` ``` ````,
/// each with an optional trailing newline) wherever they occur.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json\n", "")
        .replace("```json", "")
        .replace("```\n", "")
        .replace("```", "")
}

/// Parse the joined reply text into an [`Insight`].
pub fn parse_insight(text: &str) -> Result<Insight, InsightAcquisitionError> {
    let cleaned = strip_code_fences(text);
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(InsightAcquisitionError::Malformed(
            "empty response text".to_string(),
        ));
    }
    Ok(serde_json::from_str(cleaned)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;
    use std::time::Duration;

    const INSIGHT_JSON: &str = r#"{"summary":"Sales by region","key_findings":["North leads"],"patterns":["Seasonal"],"recommendations":["Add Q4"],"data_quality":"excellent","interesting_columns":["region"]}"#;

    fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        if name.trim().eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Serve one canned HTTP response, returning the endpoint URL and a handle
    /// yielding the raw request that was received.
    fn serve_once(status: &'static str, body: String) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            request
        });
        (format!("http://{addr}/v1/messages"), handle)
    }

    fn client_for(endpoint: String, api_key: Option<&str>) -> MessagesClient {
        MessagesClient::new(InsightConfig {
            endpoint,
            timeout: Duration::from_secs(5),
            api_key: api_key.map(str::to_string),
            ..InsightConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_complete_posts_messages_body() {
        let reply = serde_json::json!({
            "content": [
                {"type": "text", "text": "```json\n"},
                {"type": "tool_use", "id": "x"},
                {"type": "text", "text": INSIGHT_JSON},
                {"type": "text", "text": "\n```"}
            ]
        })
        .to_string();
        let (url, server) = serve_once("200 OK", reply);

        let response = client_for(url, None).complete("hello").unwrap();
        let insight = parse_insight(&response.joined_text()).unwrap();
        assert_eq!(insight.summary, "Sales by region");

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /v1/messages"));
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(!request.to_ascii_lowercase().contains("x-api-key"));
        assert!(request.contains(r#""max_tokens":1200"#));
        assert!(request.contains(r#""messages":[{"role":"user","content":"hello"}]"#));
    }

    #[test]
    fn test_runtime_key_is_attached() {
        let (url, server) = serve_once("200 OK", r#"{"content":[]}"#.to_string());
        client_for(url, Some("sk-runtime")).complete("hi").unwrap();
        let request = server.join().unwrap().to_ascii_lowercase();
        assert!(request.contains("x-api-key: sk-runtime"));
        assert!(request.contains("anthropic-version"));
    }

    #[test]
    fn test_non_success_status() {
        let (url, server) = serve_once(
            "500 Internal Server Error",
            r#"{"error":"boom"}"#.to_string(),
        );
        let err = client_for(url, None).complete("x").unwrap_err();
        server.join().unwrap();
        match err {
            InsightAcquisitionError::Status { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unexpected_body_shape_is_malformed() {
        let (url, server) = serve_once("200 OK", r#"{"choices":[]}"#.to_string());
        let err = client_for(url, None).complete("x").unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, InsightAcquisitionError::Malformed(_)));
    }

    #[test]
    fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(format!("http://{addr}/v1/messages"), None)
            .complete("x")
            .unwrap_err();
        assert!(matches!(err, InsightAcquisitionError::Network(_)));
    }

    #[test]
    fn test_slow_service_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            read_request(&mut stream);
            thread::sleep(Duration::from_millis(1500));
        });

        let client = MessagesClient::new(InsightConfig {
            endpoint: format!("http://{addr}/v1/messages"),
            timeout: Duration::from_millis(200),
            ..InsightConfig::default()
        })
        .unwrap();
        let err = client.complete("x").unwrap_err();
        assert!(matches!(err, InsightAcquisitionError::Timeout));
        server.join().unwrap();
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}\n");
        assert_eq!(strip_code_fences("a```b```json"), "ab");
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_parse_insight_rejects_prose() {
        assert!(parse_insight("Here are some thoughts about your data").is_err());
        assert!(parse_insight("```json\n```").is_err());
    }

    #[test]
    fn test_joined_text_ignores_other_blocks() {
        let response = MessagesResponse {
            content: vec![
                ContentBlock::text("ab"),
                ContentBlock {
                    kind: "thinking".to_string(),
                    text: Some("zz".to_string()),
                },
                ContentBlock::text("cd"),
            ],
        };
        assert_eq!(response.joined_text(), "abcd");
    }
}
