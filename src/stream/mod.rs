//! Streaming response decoder
//!
//! The backend streams one event per line over the HTTP response body.
//! Each line is double-encoded: the line is a JSON string literal whose
//! content is itself a serialized JSON object. Network chunking is
//! arbitrary, so a line (or a multi-byte character) may arrive split
//! across fragments.
//!
//! # Module structure
//! - `events` - Event type definitions (ChatEvent enum, DecodeError)
//! - `payloads` - Internal payload deserialization structs
//! - `decode` - Double-pass decoding, shape classification, wire encoding
//! - `assembler` - Fragment reassembly (Utf8Accumulator, ChunkAssembler)

mod assembler;
mod decode;
mod events;
mod payloads;

// Re-export public types
pub use assembler::{ChunkAssembler, Utf8Accumulator};
pub use decode::{decode_event, encode_event};
pub use events::{ChatEvent, DecodeError};
