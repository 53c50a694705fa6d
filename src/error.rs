//! Error types surfaced to consumers of the chat client.
//!
//! Only transport-level and request-level failures reach the caller.
//! Decode failures inside the stream are handled by buffering more input
//! and never escape the `stream` module.

use thiserror::Error;

/// Errors returned by [`crate::client::ChatClient`].
#[derive(Debug, Error)]
pub enum ChatError {
    /// HTTP request failed at the transport level
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status.
    ///
    /// `message` is taken from the response body's `message` field, then
    /// `detail`, and is empty when neither is present.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Request body could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
