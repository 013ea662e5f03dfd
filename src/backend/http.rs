//! HTTP client for the organizer service
//!
//! The organizer listens on a local port and speaks JSON over POST:
//!
//! - `/search`  `{"query": "...", "limit": n}` → array of objects, or
//!   `{"results": [...]}`
//! - `/analyze` `{"content": "..."}` → `{"filename": "...", "folder": "..."}`
//!
//! Either endpoint may answer with `{"error": "..."}` or `{"message": "..."}`
//! instead.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde_json::{json, Value};
use tracing::debug;

use super::{OrganizerBackend, ResultItem, Suggestion};
use crate::config::AppConfig;
use crate::error::{OrgSearchError, Result};

/// Largest slice of file content sent to `/analyze`.
pub const MAX_ANALYZE_BYTES: usize = 16 * 1024;

/// Blocking HTTP client for the organizer backend
pub struct HttpBackend {
    client: Client,
    base_url: String,
    timeout: Duration,
    max_results: usize,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration, max_results: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OrgSearchError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            max_results,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(&config.backend_url, config.timeout(), config.max_results)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.endpoint(path);
        debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .header(USER_AGENT, format!("orgsearch/{}", env!("CARGO_PKG_VERSION")))
            .json(body)
            .send()
            .map_err(|e| OrgSearchError::from_transport(e, self.timeout))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| OrgSearchError::from_transport(e, self.timeout))?;

        if !status.is_success() {
            let message =
                error_message(&text).unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(OrgSearchError::BackendError(message));
        }

        serde_json::from_str(&text).map_err(|e| OrgSearchError::MalformedResponse(e.to_string()))
    }

    /// Ask the organizer where a piece of content belongs
    pub fn analyze(&self, content: &str) -> Result<Suggestion> {
        let content = truncate_on_char_boundary(content, MAX_ANALYZE_BYTES);
        let value = self.post_json("analyze", &json!({ "content": content }))?;

        if let Some(message) = explicit_error(&value, "filename") {
            return Err(OrgSearchError::BackendError(message));
        }
        serde_json::from_value(value).map_err(|e| OrgSearchError::MalformedResponse(e.to_string()))
    }
}

impl OrganizerBackend for HttpBackend {
    fn search(&self, query: &str) -> Result<Vec<ResultItem>> {
        let body = json!({ "query": query, "limit": self.max_results });
        let value = self.post_json("search", &body)?;
        parse_results(value, self.max_results)
    }
}

fn error_field(value: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Error payload in a 2xx response. `error` always counts; `message` only
/// when the expected `payload_key` is missing.
fn explicit_error(value: &Value, payload_key: &str) -> Option<String> {
    if value.get(payload_key).is_some() {
        return value.get("error").and_then(Value::as_str).map(str::to_string);
    }
    error_field(value)
}

/// Best-effort message from an error response body
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    error_field(&value)
}

fn parse_results(value: Value, max_results: usize) -> Result<Vec<ResultItem>> {
    if let Some(message) = explicit_error(&value, "results") {
        return Err(OrgSearchError::BackendError(message));
    }

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(OrgSearchError::MalformedResponse(
                    "expected a `results` array".to_string(),
                ))
            }
        },
        other => {
            return Err(OrgSearchError::MalformedResponse(format!(
                "expected an array of results, got {}",
                json_kind(&other)
            )))
        }
    };

    items
        .into_iter()
        .take(max_results)
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(OrgSearchError::MalformedResponse(format!(
                "result #{} is {}, not an object",
                i,
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
