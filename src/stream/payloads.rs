//! Internal deserialization structs for payload classification.
//!
//! These mirror the backend's response models one-to-one and exist only so
//! classification can validate the distinguishing field's contents, not
//! just its presence.

use serde::Deserialize;

use crate::models::Source;

#[derive(Debug, Deserialize)]
pub(super) struct SourcesPayload {
    pub top_sources: Vec<Source>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TextPayload {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct QuestionsPayload {
    pub questions: Vec<String>,
}
