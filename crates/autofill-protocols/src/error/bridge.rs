//! Bridge errors.
//!
//! Raised by the transport-facing layer. None of these reach the reply
//! registry: a request that fails here is never registered.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Unknown message type: {0}")]
    UnknownMessageType(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid message body: {0}")]
    InvalidBody(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Timed out after {timeout_ms} ms waiting for reply to {message_type}")]
    Timeout { message_type: String, timeout_ms: u64 },

    #[error("Reply channel closed")]
    Closed,
}
