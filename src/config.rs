// Runtime settings
//
// Everything is read from the environment at startup. API keys are never
// compiled in: the default endpoint is a local proxy that attaches
// credentials server-side. A key can still be supplied through
// NEURAL_CANVAS_API_KEY for direct access.

use std::time::Duration;

use crate::data::loader::DEFAULT_MAX_BYTES;

pub const ENV_ENDPOINT: &str = "NEURAL_CANVAS_ENDPOINT";
pub const ENV_MODEL: &str = "NEURAL_CANVAS_MODEL";
pub const ENV_API_KEY: &str = "NEURAL_CANVAS_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "NEURAL_CANVAS_TIMEOUT_SECS";
pub const ENV_MAX_UPLOAD_MB: &str = "NEURAL_CANVAS_MAX_UPLOAD_MB";

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8787/v1/messages";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Output budget for a single insight request.
pub const INSIGHT_MAX_TOKENS: u32 = 1200;

/// Settings for the insight service client.
#[derive(Clone, PartialEq)]
pub struct InsightConfig {
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub api_key: Option<String>,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: INSIGHT_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            api_key: None,
        }
    }
}

impl std::fmt::Debug for InsightConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsightConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub insight: InsightConfig,
    /// Uploads larger than this are rejected before parsing.
    pub max_upload_bytes: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            insight: InsightConfig::default(),
            max_upload_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any name → value lookup. Empty values count as
    /// unset; unparsable numbers are logged and replaced by defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Settings::default();

        let timeout_secs = get(ENV_TIMEOUT_SECS)
            .and_then(|v| parse_number::<u64>(ENV_TIMEOUT_SECS, &v))
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let max_upload_bytes = get(ENV_MAX_UPLOAD_MB)
            .and_then(|v| parse_number::<u64>(ENV_MAX_UPLOAD_MB, &v))
            .map(|mb| mb.saturating_mul(1024 * 1024))
            .unwrap_or(defaults.max_upload_bytes);

        Settings {
            insight: InsightConfig {
                endpoint: get(ENV_ENDPOINT).unwrap_or(defaults.insight.endpoint),
                model: get(ENV_MODEL).unwrap_or(defaults.insight.model),
                max_tokens: INSIGHT_MAX_TOKENS,
                timeout: Duration::from_secs(timeout_secs),
                api_key: get(ENV_API_KEY),
            },
            max_upload_bytes,
        }
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Option<T> {
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("Ignoring {name}={raw:?}: not a valid number");
            None
        }
    }
}
