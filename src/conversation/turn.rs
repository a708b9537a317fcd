//! Conversation turns and the append-only transcript

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audio::AudioFormat;

/// Author of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// Audio attached to a turn, held in memory
#[derive(Clone, PartialEq, Eq)]
pub struct AudioClip {
    format: AudioFormat,
    bytes: Vec<u8>,
}

impl AudioClip {
    #[must_use]
    pub const fn new(format: AudioFormat, bytes: Vec<u8>) -> Self {
        Self { format, bytes }
    }

    #[must_use]
    pub const fn format(&self) -> AudioFormat {
        self.format
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// `data:` URL suitable for an HTML `<audio>` element
    #[must_use]
    pub fn data_url(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{encoded}", self.format.mime_type())
    }
}

impl std::fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioClip")
            .field("format", &self.format)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// One message in the conversation
///
/// Turns are immutable once created.
#[derive(Debug, Clone)]
pub struct Turn {
    role: Role,
    content: String,
    audio: Option<AudioClip>,
    created_at: DateTime<Utc>,
}

impl Turn {
    /// A turn authored by the user
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into(), None)
    }

    /// A text-only assistant reply
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content.into(), None)
    }

    /// An assistant reply with synthesized speech
    #[must_use]
    pub fn assistant_with_audio(content: impl Into<String>, audio: AudioClip) -> Self {
        Self::new(Role::Assistant, content.into(), Some(audio))
    }

    fn new(role: Role, content: String, audio: Option<AudioClip>) -> Self {
        Self {
            role,
            content,
            audio,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub const fn audio(&self) -> Option<&AudioClip> {
        self.audio.as_ref()
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Ordered transcript of turns
///
/// Append-only: insertion order is display order and nothing is removed.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    #[must_use]
    pub const fn new() -> Self {
        Self { turns: Vec::new() }
    }

    pub(crate) fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_order_is_preserved() {
        let mut conversation = Conversation::new();
        conversation.push(Turn::user("one"));
        conversation.push(Turn::assistant("two"));
        conversation.push(Turn::user("three"));

        let contents: Vec<&str> = conversation.iter().map(Turn::content).collect();
        assert_eq!(contents, ["one", "two", "three"]);
        assert_eq!(conversation.last().map(Turn::role), Some(Role::User));

        let stamps: Vec<_> = conversation.iter().map(Turn::created_at).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_audio_clip_data_url() {
        let clip = AudioClip::new(AudioFormat::Mp3, b"abc".to_vec());
        assert_eq!(clip.data_url(), "data:audio/mpeg;base64,YWJj");
        assert_eq!(format!("{clip:?}"), "AudioClip { format: Mp3, bytes: 3 }");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        assert_eq!(Role::User.as_str(), "user");
    }
}
