//! DTOs for the test prompt endpoint and the standard response envelope.
//!
//! # Design
//! The client hands back the decoded envelope as a raw `JsonObject` so callers
//! see exactly what the server sent. `Envelope` and `TestPromptData` are
//! optional typed views over that object. They are defined independently of
//! the mock-server crate; integration tests catch schema drift.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;

/// A decoded JSON object, as returned by `decode_json`.
pub type JsonObject = serde_json::Map<String, Value>;

pub const DEFAULT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_MAX_TOKENS: u32 = 256;

/// Request payload for `POST /api/test_prompt.php`.
///
/// `model` is left out of the JSON entirely when unset, never sent as null.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestPromptRequest {
    pub prompt: String,
    pub temperature: f64,
    pub max_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl TestPromptRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            model: None,
        }
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// The `error` member of an envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Typed view of `{ok, data, error, meta}`. Every member is optional so
/// partial or legacy envelopes still convert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    #[serde(default)]
    pub ok: Option<bool>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub error: Option<ErrorBody>,
    #[serde(default)]
    pub meta: Value,
}

impl Envelope {
    pub fn from_decoded(decoded: &JsonObject) -> Result<Self, ClientError> {
        serde_json::from_value(Value::Object(decoded.clone())).map_err(|e| ClientError::Decode {
            reason: format!("unexpected envelope shape: {e}"),
            body: Value::Object(decoded.clone()).to_string(),
        })
    }

    /// Deserialize `data` into `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_value(self.data.clone()).map_err(|e| ClientError::Decode {
            reason: format!("unexpected data shape: {e}"),
            body: self.data.to_string(),
        })
    }
}

/// `data` returned by the test prompt endpoint on success.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestPromptData {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_omits_model_when_unset() {
        let body = serde_json::to_value(TestPromptRequest::new("hello")).unwrap();
        assert_eq!(body, json!({"prompt": "hello", "temperature": 0.2, "max_tokens": 256}));
    }

    #[test]
    fn request_builder_overrides_defaults() {
        let req = TestPromptRequest::new("hi")
            .temperature(0.7)
            .max_tokens(512)
            .model("gpt-4.1-mini");
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["model"], "gpt-4.1-mini");
    }

    #[test]
    fn envelope_accepts_null_error_and_missing_members() {
        let decoded = json!({"ok": true, "data": {"answer": "42"}, "error": null});
        let envelope = Envelope::from_decoded(decoded.as_object().unwrap()).unwrap();
        assert_eq!(envelope.ok, Some(true));
        assert!(envelope.error.is_none());
        assert_eq!(envelope.meta, Value::Null);

        let data: TestPromptData = envelope.data_as().unwrap();
        assert_eq!(data.answer.as_deref(), Some("42"));
        assert!(data.model.is_none());
    }

    #[test]
    fn envelope_rejects_non_object_error() {
        let decoded = json!({"ok": false, "error": "boom"});
        let err = Envelope::from_decoded(decoded.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }
}
