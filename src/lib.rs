//! Ragchat - a streaming chat client for retrieval-backed Q&A services
//!
//! The backend answers a question with a newline-delimited stream of
//! double-encoded JSON events: source citations, incremental answer text,
//! and follow-up questions. This crate reassembles and decodes that stream
//! and exposes it as an async sequence of typed events.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod stream;
pub mod turn;
