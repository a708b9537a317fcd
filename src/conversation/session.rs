//! Per-session state: transcript plus re-entrancy and dedup markers

use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::turn::{Conversation, Turn};

/// SHA-256 fingerprint of a recorded audio blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioDigest([u8; 32]);

impl AudioDigest {
    #[must_use]
    pub fn of(blob: &[u8]) -> Self {
        Self(Sha256::digest(blob).into())
    }
}

impl std::fmt::Display for AudioDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Why a submission was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Blank text or zero-length audio
    Empty,
    /// Same payload as the previous submission on this input
    Duplicate,
    /// Another interaction is in flight
    Busy,
}

/// Dedup marker recorded when an interaction starts
#[derive(Debug, Clone)]
pub(crate) enum Marker {
    Text(String),
    Audio(AudioDigest),
}

/// Marker values to restore if an interaction fails
#[derive(Debug)]
pub(crate) enum Checkpoint {
    Text(Option<String>),
    Audio(Option<AudioDigest>),
}

/// State of one chat session
#[derive(Debug)]
pub struct SessionState {
    id: Uuid,
    conversation: Conversation,
    awaiting_response: bool,
    last_input: Option<String>,
    last_recorded_audio: Option<AudioDigest>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation: Conversation::new(),
            awaiting_response: false,
            last_input: None,
            last_recorded_audio: None,
        }
    }

    /// Session identifier, for log correlation
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub const fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    #[must_use]
    pub const fn is_awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    #[must_use]
    pub fn last_input(&self) -> Option<&str> {
        self.last_input.as_deref()
    }

    #[must_use]
    pub const fn last_recorded_audio(&self) -> Option<&AudioDigest> {
        self.last_recorded_audio.as_ref()
    }

    /// Check whether `text` should start a new interaction
    ///
    /// # Errors
    ///
    /// Returns the reason the submission must be ignored
    pub fn accepts_text(&self, text: &str) -> Result<(), SkipReason> {
        if text.trim().is_empty() {
            return Err(SkipReason::Empty);
        }
        if self.last_input.as_deref() == Some(text) {
            return Err(SkipReason::Duplicate);
        }
        if self.awaiting_response {
            return Err(SkipReason::Busy);
        }
        Ok(())
    }

    /// Check whether `blob` should start a new interaction
    ///
    /// # Errors
    ///
    /// Returns the reason the submission must be ignored
    pub fn accepts_audio(&self, blob: &[u8]) -> Result<AudioDigest, SkipReason> {
        if blob.is_empty() {
            return Err(SkipReason::Empty);
        }
        let digest = AudioDigest::of(blob);
        if self.last_recorded_audio == Some(digest) {
            return Err(SkipReason::Duplicate);
        }
        if self.awaiting_response {
            return Err(SkipReason::Busy);
        }
        Ok(digest)
    }

    /// Mark an interaction in flight and record its dedup marker
    pub(crate) fn begin(&mut self, marker: Marker) -> Checkpoint {
        self.awaiting_response = true;
        match marker {
            Marker::Text(text) => Checkpoint::Text(self.last_input.replace(text)),
            Marker::Audio(digest) => {
                Checkpoint::Audio(self.last_recorded_audio.replace(digest))
            }
        }
    }

    /// Append the turns produced by a successful interaction
    pub(crate) fn commit(&mut self, turns: Vec<Turn>) {
        for turn in turns {
            self.conversation.push(turn);
        }
        self.awaiting_response = false;
    }

    /// Undo `begin` after a failed interaction
    pub(crate) fn abort(&mut self, checkpoint: Checkpoint) {
        match checkpoint {
            Checkpoint::Text(previous) => self.last_input = previous,
            Checkpoint::Audio(previous) => self.last_recorded_audio = previous,
        }
        self.awaiting_response = false;
    }
}
