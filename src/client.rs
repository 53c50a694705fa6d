//! Chat API client for backend communication.
//!
//! This module provides the HTTP client for the streaming chat endpoint.
//! It issues the request, surfaces request-level failures, and drives the
//! byte stream through the reassembler so callers consume typed events.

use futures_util::stream::{self, Stream};
use futures_util::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use std::collections::VecDeque;
use std::pin::Pin;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ChatError;
use crate::models::SendMessageRequest;
use crate::stream::{ChatEvent, ChunkAssembler};

/// A pull-based sequence of decoded chat events.
///
/// Events arrive in wire order. Dropping the stream before completion
/// closes the underlying connection; events already yielded stand.
pub struct ChatEventStream {
    inner: Pin<Box<dyn Stream<Item = Result<ChatEvent, ChatError>> + Send>>,
}

impl std::fmt::Debug for ChatEventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ChatEventStream")
    }
}

impl Stream for ChatEventStream {
    type Item = Result<ChatEvent, ChatError>;

    fn poll_next(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

/// Error body shape for non-success responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    detail: Option<String>,
}

/// Client for the streaming chat backend.
///
/// Each [`ChatClient::send_message`] call opens a fresh connection and owns
/// it for the lifetime of the returned stream; nothing is shared between
/// calls except the connection pool inside [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ChatClient {
    config: ClientConfig,
    client: Client,
}

impl ChatClient {
    /// Create a client for the configured endpoint.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Create a client with a custom [`reqwest::Client`], e.g. to set
    /// request timeouts or TLS options.
    pub fn with_client(config: ClientConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// The endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Ask a question with no conversation history.
    ///
    /// Convenience wrapper around [`ChatClient::send_message`].
    pub async fn ask(&self, message: &str) -> Result<ChatEventStream, ChatError> {
        self.send_message(&SendMessageRequest::new(message)).await
    }

    /// Send a message and stream the decoded response events.
    ///
    /// A non-success status terminates immediately with
    /// [`ChatError::Server`], carrying the body's `message` field, then
    /// `detail`, then an empty string. On success the returned stream
    /// yields every event in arrival order; a transport read error yields
    /// one terminal [`ChatError::Http`] and ends the stream. An
    /// unterminated trailing event at end of stream is dropped.
    pub async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<ChatEventStream, ChatError> {
        let url = format!("{}/chat", self.config.endpoint);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|e| e.message.or(e.detail))
                .unwrap_or_default();
            return Err(ChatError::Server { status, message });
        }

        let bytes_stream = response.bytes_stream();

        // Drive the assembler over the byte stream. One fragment can
        // complete several events, so completed-but-unyielded events wait
        // in a queue inside the unfold state.
        let event_stream = stream::unfold(
            (bytes_stream, ChunkAssembler::new(), VecDeque::new(), false),
            |(mut bytes_stream, mut assembler, mut ready, mut done)| async move {
                loop {
                    if let Some(event) = ready.pop_front() {
                        return Some((Ok(event), (bytes_stream, assembler, ready, done)));
                    }
                    if done {
                        return None;
                    }

                    match bytes_stream.next().await {
                        Some(Ok(fragment)) => {
                            ready.extend(assembler.feed(&fragment));
                        }
                        Some(Err(e)) => {
                            // Terminal: no further pulls after a transport error
                            done = true;
                            return Some((
                                Err(ChatError::Http(e)),
                                (bytes_stream, assembler, ready, done),
                            ));
                        }
                        None => {
                            if let Some(leftover) = assembler.finish() {
                                debug!(
                                    len = leftover.len(),
                                    "dropping unterminated trailing event at end of stream"
                                );
                            }
                            done = true;
                        }
                    }
                }
            },
        );

        Ok(ChatEventStream {
            inner: Box::pin(event_stream),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_endpoint() {
        let client = ChatClient::new(ClientConfig::new("http://localhost:9000"));
        assert_eq!(client.endpoint(), "http://localhost:9000");
    }

    #[test]
    fn test_client_with_custom_reqwest_client() {
        let inner = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap();
        let client = ChatClient::with_client(ClientConfig::default(), inner);
        assert_eq!(client.endpoint(), crate::config::DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_error_body_priority_shapes() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"message": "m", "detail": "d"}"#).unwrap();
        assert_eq!(body.message.or(body.detail).unwrap(), "m");

        let body: ErrorBody = serde_json::from_str(r#"{"detail": "d"}"#).unwrap();
        assert_eq!(body.message.or(body.detail).unwrap(), "d");

        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.message.or(body.detail).is_none());
    }

    #[tokio::test]
    async fn test_send_message_with_unreachable_server() {
        let client = ChatClient::new(ClientConfig::new("http://127.0.0.1:1"));
        let result = client.ask("hello").await;
        assert!(matches!(result, Err(ChatError::Http(_))));
    }
}
