use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};

pub const TEST_PROMPT_PATH: &str = "/api/test_prompt.php";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// Standard response envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    pub data: Value,
    pub error: Option<ApiErrorBody>,
    pub meta: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiResponse {
    pub fn success(data: Value) -> Self {
        Self {
            ok: true,
            data,
            error: None,
            meta: json!({}),
        }
    }

    pub fn failure(code: &str, message: &str) -> Self {
        Self {
            ok: false,
            data: Value::Null,
            error: Some(ApiErrorBody {
                code: code.to_string(),
                message: message.to_string(),
            }),
            meta: json!({}),
        }
    }
}

/// Every JSON object posted to the endpoint, in arrival order.
pub type Received = Arc<RwLock<Vec<Value>>>;

pub fn app() -> Router {
    app_with_state(Received::default())
}

pub fn app_with_state(received: Received) -> Router {
    Router::new()
        .route(TEST_PROMPT_PATH, post(test_prompt).fallback(method_not_allowed))
        .with_state(received)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, Received::default()).await
}

pub async fn run_with_state(listener: TcpListener, received: Received) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(received)).await
}

async fn test_prompt(State(received): State<Received>, body: Bytes) -> (StatusCode, Json<ApiResponse>) {
    let input = match serde_json::from_slice::<Value>(&body) {
        Ok(input @ Value::Object(_)) => input,
        _ => {
            warn!(bytes = body.len(), "rejecting non-object body");
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure("invalid_json", "invalid JSON body")),
            );
        }
    };
    received.write().await.push(input.clone());

    let prompt = input.get("prompt").map(scalar_text).unwrap_or_default();
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::failure("missing_field_prompt", "field \"prompt\" is required")),
        );
    }

    let model = input
        .get("model")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_MODEL);
    info!(model, prompt_len = prompt.len(), "answering test prompt");

    (
        StatusCode::OK,
        Json(ApiResponse::success(json!({
            "answer": format!("echo: {prompt}"),
            "model": model,
        }))),
    )
}

/// Scalars are coerced to text the way the production endpoint casts them;
/// null, false, arrays and objects yield an empty string.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        _ => String::new(),
    }
}

async fn method_not_allowed() -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ApiResponse::failure("method_not_allowed", "use POST")),
    )
}
