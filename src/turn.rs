//! Conversation turn aggregation.
//!
//! The stream only guarantees which events arrive and in what order; how
//! they become visible state is the consumer's job. [`ConversationTurn`]
//! is that fold: text deltas append, sources and follow-ups replace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{MessageRole, Source};
use crate::stream::ChatEvent;

/// One turn of a conversation as accumulated from the event stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationTurn {
    /// Who produced this turn
    pub role: MessageRole,
    /// Answer text accumulated so far
    pub text: String,
    /// Citations for the answer
    pub sources: Vec<Source>,
    /// Suggested follow-up questions
    pub follow_ups: Vec<String>,
    /// When the turn started
    pub started_at: DateTime<Utc>,
}

impl ConversationTurn {
    /// A completed user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
            sources: Vec::new(),
            follow_ups: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// An empty assistant turn, ready to fold stream events into.
    pub fn assistant() -> Self {
        Self {
            role: MessageRole::Assistant,
            text: String::new(),
            sources: Vec::new(),
            follow_ups: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Fold one stream event into the turn.
    ///
    /// Unrecognized events are ignored; they carry nothing this view
    /// knows how to show.
    pub fn apply(&mut self, event: &ChatEvent) {
        match event {
            ChatEvent::Sources { top_sources } => {
                self.sources = top_sources.clone();
            }
            ChatEvent::Text { text: Some(delta) } => {
                self.text.push_str(delta);
            }
            ChatEvent::Text { text: None } => {}
            ChatEvent::FollowUps { questions } => {
                self.follow_ups = questions.clone();
            }
            ChatEvent::Unrecognized(_) => {}
        }
    }
}
