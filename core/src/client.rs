//! Stateless client for the Alabama test prompt API.
//!
//! # Design
//! `AlabamaClient` holds an immutable `ClientConfig` and a `Transport`, and
//! carries no state between calls. `post_json` is split into a pure
//! `build_post_json` step, one transport round-trip, and a pure
//! `parse_response` step, so request building and response normalization are
//! testable without a network.
//!
//! Error messages are resolved by `extract_error_message`, which walks an
//! ordered list of strategies: the current `error` object first, then the
//! legacy top-level `erro` and `message` fields.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::types::{Envelope, JsonObject, TestPromptData, TestPromptRequest};

/// Path of the test prompt endpoint, relative to the base URL.
pub const TEST_PROMPT_PATH: &str = "/api/test_prompt.php";

/// Fallback message for `"ok": false` envelopes that carry no error text.
pub const UNKNOWN_ERROR: &str = "unknown error";

/// Synchronous, stateless client for the test prompt API.
///
/// Safe to share across threads: the config is read-only and the transport
/// is required to be `Send + Sync`.
#[derive(Debug, Clone)]
pub struct AlabamaClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl AlabamaClient<UreqTransport> {
    /// Client backed by a blocking `ureq` agent using `config.timeout()`.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout());
        Self { config, transport }
    }

    /// Client configured from `ALABAMA_API_BASE_URL` and the default timeout.
    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env(None, None))
    }
}

impl<T: Transport> AlabamaClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send `prompt` with the default temperature and token limit.
    pub fn test_prompt(&self, prompt: &str) -> Result<JsonObject, ClientError> {
        self.test_prompt_with(&TestPromptRequest::new(prompt))
    }

    pub fn test_prompt_with(&self, request: &TestPromptRequest) -> Result<JsonObject, ClientError> {
        self.post_json(TEST_PROMPT_PATH, request)
    }

    /// Send `prompt` and return the typed `data` of the envelope.
    pub fn test_prompt_data(&self, request: &TestPromptRequest) -> Result<TestPromptData, ClientError> {
        let decoded = self.test_prompt_with(request)?;
        Envelope::from_decoded(&decoded)?.data_as()
    }

    /// POST `payload` as JSON to `base_url + path` and normalize the reply.
    ///
    /// Returns the decoded envelope unchanged when the server reports success.
    /// An envelope without an `ok` member counts as success.
    pub fn post_json<P: Serialize + ?Sized>(&self, path: &str, payload: &P) -> Result<JsonObject, ClientError> {
        let request = self.build_post_json(path, payload)?;
        debug!(url = %request.url, "sending request");
        let response = self.transport.execute(&request).inspect_err(|e| {
            warn!(url = %request.url, error = %e, "request failed before a response arrived");
        })?;
        debug!(
            status = response.status,
            content_type = response.header("content-type").unwrap_or("-"),
            "normalizing response"
        );
        self.parse_response(response).inspect_err(|e| {
            warn!(url = %request.url, error = %e, "API call failed");
        })
    }

    pub fn build_post_json<P: Serialize + ?Sized>(&self, path: &str, payload: &P) -> Result<HttpRequest, ClientError> {
        let body = serde_json::to_string(payload).map_err(|e| ClientError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            url: format!("{}{path}", self.config.base_url()),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
            ],
            body,
        })
    }

    pub fn parse_response(&self, response: HttpResponse) -> Result<JsonObject, ClientError> {
        if !(200..300).contains(&response.status) {
            return Err(ClientError::Api {
                status: response.status,
                message: failure_message(&response),
            });
        }

        let decoded = decode_json(&response.body)?;
        if decoded.get("ok") == Some(&Value::Bool(false)) {
            return Err(ClientError::Api {
                status: response.status,
                message: extract_error_message(&decoded, UNKNOWN_ERROR),
            });
        }
        Ok(decoded)
    }
}

/// Message for a non-2xx response: the extracted error text if the body is a
/// JSON object, else the raw body, else `HTTP <status>`.
fn failure_message(response: &HttpResponse) -> String {
    let message = match decode_json(&response.body) {
        Ok(decoded) => extract_error_message(&decoded, &response.body),
        Err(_) => response.body.clone(),
    };
    if message.is_empty() {
        format!("HTTP {}", response.status)
    } else {
        message
    }
}

/// Decode a response body into a JSON object. An empty body is `{}`.
pub fn decode_json(body: &str) -> Result<JsonObject, ClientError> {
    if body.is_empty() {
        return Ok(JsonObject::new());
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ClientError::Decode {
            reason: "expected a JSON object".to_string(),
            body: body.to_string(),
        }),
        Err(e) => Err(ClientError::Decode {
            reason: format!("not JSON: {e}"),
            body: body.to_string(),
        }),
    }
}

type ErrorStrategy = fn(&JsonObject, &str) -> Option<String>;

/// Applied in order; the first strategy that returns `Some` wins.
const ERROR_STRATEGIES: [ErrorStrategy; 3] = [envelope_error, legacy_erro, legacy_message];

/// Resolve a human-readable error message from a decoded body, or `fallback`.
pub fn extract_error_message(decoded: &JsonObject, fallback: &str) -> String {
    ERROR_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(decoded, fallback))
        .unwrap_or_else(|| fallback.to_string())
}

/// `error: {code, message}`. Once an error object is present it decides the
/// outcome, falling back rather than consulting the legacy fields.
fn envelope_error(decoded: &JsonObject, fallback: &str) -> Option<String> {
    let error = decoded.get("error")?.as_object()?;
    let text = |key: &str| error.get(key).and_then(truthy_text);
    Some(text("message").or_else(|| text("code")).unwrap_or_else(|| fallback.to_string()))
}

/// Text of a member that counts as set: null, false, zero, and empty strings,
/// arrays or objects count as unset. Non-string values are rendered as JSON.
fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(members) if members.is_empty() => None,
        other => Some(other.to_string()),
    }
}

fn legacy_erro(decoded: &JsonObject, _fallback: &str) -> Option<String> {
    decoded.get("erro")?.as_str().map(str::to_string)
}

fn legacy_message(decoded: &JsonObject, _fallback: &str) -> Option<String> {
    decoded.get("message")?.as_str().map(str::to_string)
}
