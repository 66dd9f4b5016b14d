//! Error types for the test prompt API client.
//!
//! # Design
//! Failures are split by where they happened. `Network` means no response
//! ever arrived. `Decode` means a response arrived but its body was not a
//! JSON object, and it keeps the raw body for diagnosis. `Api` means the
//! server answered and reported a failure, either through a non-2xx status
//! or through `"ok": false` inside a 2xx envelope.

use std::fmt;

/// Errors returned by `AlabamaClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The response body is not valid JSON, or is JSON but not an object.
    Decode { reason: String, body: String },

    /// Transport-level failure: timeout, DNS, refused or reset connection.
    Network(String),

    /// The server responded but indicated failure.
    Api { status: u16, message: String },

    /// The request payload could not be serialized to JSON.
    Serialization(String),
}

impl ClientError {
    /// HTTP status attached to the error, if the server responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Decode { reason, body } => {
                write!(f, "invalid API response ({reason}): {body}")
            }
            ClientError::Network(cause) => write!(f, "network error calling API: {cause}"),
            ClientError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ClientError::Serialization(msg) => write!(f, "serialization failed: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}
