//! Synchronous client for the Alabama test prompt API.
//!
//! # Overview
//! Sends a JSON POST to `{base_url}/api/test_prompt.php` and normalizes the
//! `{ok, data, error, meta}` envelope into either the decoded object or a
//! `ClientError`. Older deployments that report errors through top-level
//! `erro` / `message` strings are understood too.
//!
//! # Design
//! - `AlabamaClient` is stateless: an immutable `ClientConfig` plus a
//!   `Transport`. No retries, no pooling, no session state.
//! - Each call is `build_post_json` (pure), one `Transport::execute`, then
//!   `parse_response` (pure), so the I/O boundary is explicit.
//! - Configuration resolves `explicit > ALABAMA_API_BASE_URL > default`.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use client::{decode_json, extract_error_message, AlabamaClient, TEST_PROMPT_PATH, UNKNOWN_ERROR};
pub use config::{resolve_base_url, ClientConfig, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::ClientError;
pub use http::{HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{
    Envelope, ErrorBody, JsonObject, TestPromptData, TestPromptRequest, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
