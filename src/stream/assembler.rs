//! Fragment reassembly for the newline-delimited chat stream.
//!
//! The transport delivers arbitrarily sized byte fragments with no
//! alignment to event boundaries: a line can arrive spread over several
//! fragments, and a multi-byte character can itself be cut in half. The
//! [`Utf8Accumulator`] handles the byte level, the [`ChunkAssembler`] the
//! line level.

use tracing::trace;

use crate::stream::decode::decode_event;
use crate::stream::events::ChatEvent;

/// Incremental UTF-8 decoder.
///
/// An incomplete multi-byte sequence at the end of a fragment is retained
/// and prepended to the next one. Genuinely invalid bytes are replaced
/// with U+FFFD so a corrupt fragment cannot stall the stream.
#[derive(Debug, Default)]
pub struct Utf8Accumulator {
    /// Trailing bytes of a character whose remainder has not arrived yet
    partial: Vec<u8>,
}

impl Utf8Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a fragment, carrying held-over bytes from the previous call.
    pub fn decode(&mut self, fragment: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.partial);
        bytes.extend_from_slice(fragment);

        let mut out = String::new();
        let mut rest = bytes.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    out.push_str(text);
                    break;
                }
                Err(err) => {
                    let (valid, tail) = rest.split_at(err.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        // Could still become valid with more bytes
                        None => {
                            self.partial = tail.to_vec();
                            break;
                        }
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &tail[len..];
                        }
                    }
                }
            }
        }
        out
    }

    /// Bytes currently held over, if any.
    pub fn pending(&self) -> &[u8] {
        &self.partial
    }
}

/// Reassembles complete events out of raw transport fragments.
///
/// Fragments are decoded to text and split on newlines. Every non-empty
/// segment, prefixed with any unresolved carry, gets one decode attempt:
/// success emits the event and clears the carry, failure keeps the
/// concatenated text as the new carry until more data arrives.
#[derive(Debug, Default)]
pub struct ChunkAssembler {
    utf8: Utf8Accumulator,
    /// Text of an event that has not decoded successfully yet
    carry: Option<String>,
}

impl ChunkAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw fragment, returning every event it completed, in order.
    ///
    /// A fragment that completes nothing returns an empty vec; that is a
    /// normal outcome, not an error.
    pub fn feed(&mut self, fragment: &[u8]) -> Vec<ChatEvent> {
        let text = self.utf8.decode(fragment);

        let mut events = Vec::new();
        for segment in text.split('\n') {
            if segment.is_empty() {
                continue;
            }
            let candidate = match self.carry.take() {
                Some(carry) => carry + segment,
                None => segment.to_string(),
            };
            match decode_event(&candidate) {
                Ok(event) => events.push(event),
                Err(err) => {
                    trace!(error = %err, len = candidate.len(), "holding incomplete event as carry");
                    self.carry = Some(candidate);
                }
            }
        }
        events
    }

    /// Take any unresolved carry at end of stream.
    ///
    /// An unterminated trailing line is incomplete data to be dropped by
    /// the caller, never surfaced as a partial event.
    pub fn finish(&mut self) -> Option<String> {
        self.utf8.partial.clear();
        self.carry.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Source;
    use crate::stream::decode::encode_event;

    fn sample_events() -> Vec<ChatEvent> {
        vec![
            ChatEvent::Sources {
                top_sources: vec![Source {
                    filename: "théorie.md".to_string(),
                    heading: "Résumé".to_string(),
                }],
            },
            ChatEvent::Text {
                text: Some("héllo ".to_string()),
            },
            ChatEvent::Text {
                text: Some("wörld ✓".to_string()),
            },
            ChatEvent::FollowUps {
                questions: vec!["What is X?".to_string()],
            },
        ]
    }

    fn wire_bytes(events: &[ChatEvent]) -> Vec<u8> {
        let mut out = String::new();
        for event in events {
            out.push_str(&encode_event(event));
            out.push('\n');
        }
        out.into_bytes()
    }

    #[test]
    fn test_whole_stream_in_one_fragment() {
        let events = sample_events();
        let mut assembler = ChunkAssembler::new();
        let decoded = assembler.feed(&wire_bytes(&events));
        assert_eq!(decoded, events);
        assert!(assembler.finish().is_none());
    }

    #[test]
    fn test_fragmentation_invariance_at_every_split_point() {
        // Splitting the byte stream anywhere, including mid multi-byte
        // character and mid-line, must yield the same event sequence.
        let events = sample_events();
        let bytes = wire_bytes(&events);

        for split in 1..bytes.len() {
            let mut assembler = ChunkAssembler::new();
            let mut decoded = assembler.feed(&bytes[..split]);
            decoded.extend(assembler.feed(&bytes[split..]));
            assert_eq!(decoded, events, "diverged at split offset {split}");
            assert!(assembler.finish().is_none());
        }
    }

    #[test]
    fn test_fragmentation_invariance_tiny_fragments() {
        let events = sample_events();
        let bytes = wire_bytes(&events);

        let mut assembler = ChunkAssembler::new();
        let mut decoded = Vec::new();
        for piece in bytes.chunks(3) {
            decoded.extend(assembler.feed(piece));
        }
        assert_eq!(decoded, events);
    }

    #[test]
    fn test_empty_fragment_is_a_no_op() {
        let mut assembler = ChunkAssembler::new();
        assert!(assembler.feed(b"").is_empty());
        assert!(assembler.finish().is_none());
    }

    #[test]
    fn test_newline_only_fragment_yields_nothing() {
        let mut assembler = ChunkAssembler::new();
        assert!(assembler.feed(b"\n\n\n").is_empty());
    }

    #[test]
    fn test_carry_survives_across_fragments() {
        let line = encode_event(&ChatEvent::Text {
            text: Some("Hello".to_string()),
        });
        let bytes = line.as_bytes();
        let mid = bytes.len() / 2;

        let mut assembler = ChunkAssembler::new();
        assert!(assembler.feed(&bytes[..mid]).is_empty());

        let mut tail = bytes[mid..].to_vec();
        tail.push(b'\n');
        let decoded = assembler.feed(&tail);
        assert_eq!(
            decoded,
            vec![ChatEvent::Text {
                text: Some("Hello".to_string())
            }]
        );
    }

    #[test]
    fn test_trailing_partial_is_dropped() {
        // Intentional best-effort semantics: a stream ending mid-event
        // yields only the complete events and no error.
        let complete = encode_event(&ChatEvent::Text {
            text: Some("done".to_string()),
        });
        let stream = format!("{complete}\n\"{{\\\"text\\\": \\\"trunc");

        let mut assembler = ChunkAssembler::new();
        let decoded = assembler.feed(stream.as_bytes());
        assert_eq!(
            decoded,
            vec![ChatEvent::Text {
                text: Some("done".to_string())
            }]
        );

        let leftover = assembler.finish();
        assert!(leftover.is_some());
        // finish drains the carry; nothing remains afterwards
        assert!(assembler.finish().is_none());
    }

    #[test]
    fn test_utf8_accumulator_holds_split_character() {
        let mut utf8 = Utf8Accumulator::new();
        let bytes = "é".as_bytes();
        assert_eq!(utf8.decode(&bytes[..1]), "");
        assert_eq!(utf8.pending(), &bytes[..1]);
        assert_eq!(utf8.decode(&bytes[1..]), "é");
        assert!(utf8.pending().is_empty());
    }

    #[test]
    fn test_utf8_accumulator_replaces_invalid_bytes() {
        let mut utf8 = Utf8Accumulator::new();
        let decoded = utf8.decode(b"ok\xFF\xFEok");
        assert_eq!(decoded, "ok\u{FFFD}\u{FFFD}ok");
    }
}
