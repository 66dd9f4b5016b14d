//! Verify response normalization against JSON test vectors in `test-vectors/`.
//!
//! Each vector pairs a raw input with the expected outcome. Comparing parsed
//! JSON (not raw strings) avoids false negatives from field ordering.

use std::time::Duration;

use alabama_core::{
    extract_error_message, AlabamaClient, ClientConfig, ClientError, HttpRequest, HttpResponse, TestPromptRequest,
    Transport, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, UNKNOWN_ERROR,
};
use serde_json::Value;

/// Never called: the vectors only exercise `parse_response`.
struct Offline;

impl Transport for Offline {
    fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        Err(ClientError::Network("offline".to_string()))
    }
}

fn client() -> AlabamaClient<Offline> {
    AlabamaClient::with_transport(ClientConfig::new("http://localhost:8000", Duration::from_secs(1)), Offline)
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse {
            status: case["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: case["body"].as_str().unwrap().to_string(),
        };
        let expected = &case["expected"];
        let result = c.parse_response(response);

        if let Some(decoded) = expected.get("decoded") {
            let got = result.unwrap_or_else(|e| panic!("{name}: unexpected error {e}"));
            assert_eq!(&Value::Object(got), decoded, "{name}: decoded envelope");
            continue;
        }

        let want = &expected["error"];
        let err = result.expect_err(name);
        match want["kind"].as_str().unwrap() {
            "api" => {
                let (status, message) = match err {
                    ClientError::Api { status, message } => (status, message),
                    other => panic!("{name}: expected Api error, got {other:?}"),
                };
                assert_eq!(u64::from(status), want["status"].as_u64().unwrap(), "{name}: status");
                assert_eq!(message, want["message"].as_str().unwrap(), "{name}: message");
            }
            "decode" => {
                let body = match err {
                    ClientError::Decode { body, .. } => body,
                    other => panic!("{name}: expected Decode error, got {other:?}"),
                };
                assert_eq!(body, want["body"].as_str().unwrap(), "{name}: raw body");
            }
            other => panic!("{name}: unknown error kind {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Error message extraction
// ---------------------------------------------------------------------------

#[test]
fn error_message_test_vectors() {
    let raw = include_str!("../../test-vectors/error_messages.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let decoded = case["decoded"].as_object().unwrap();
        let fallback = case["fallback"].as_str().unwrap();
        assert_eq!(
            extract_error_message(decoded, fallback),
            case["expected"].as_str().unwrap(),
            "{name}"
        );
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn public_defaults_match_wire_values() {
    let request = TestPromptRequest::new("hello");
    assert_eq!(request.temperature, DEFAULT_TEMPERATURE);
    assert_eq!(request.max_tokens, DEFAULT_MAX_TOKENS);
    assert_eq!(
        request_body(&request),
        serde_json::json!({"prompt": "hello", "temperature": 0.2, "max_tokens": 256})
    );

    let err = client()
        .parse_response(HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"ok":false}"#.to_string(),
        })
        .unwrap_err();
    assert_eq!(
        err,
        ClientError::Api {
            status: 200,
            message: UNKNOWN_ERROR.to_string(),
        }
    );
}

fn request_body(request: &TestPromptRequest) -> Value {
    let req = client().build_post_json("/api/test_prompt.php", request).unwrap();
    serde_json::from_str(&req.body).unwrap()
}
