//! Input event handlers for typed and spoken turns
//!
//! Each handler takes the session by value and hands it back in [`Handled`]
//! together with the outcome. Turns are staged and appended only once every
//! external call for the interaction has succeeded, so a failure leaves the
//! earlier transcript exactly as it was.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::Instrument;

use super::scratch::ScratchFile;
use super::session::{Marker, SessionState, SkipReason};
use super::turn::{AudioClip, Turn};
use crate::Result;
use crate::audio::AudioFormat;
use crate::openai::AiClient;

/// A user input event
#[derive(Debug, Clone)]
pub enum Event {
    /// Text typed into the message field
    Text(String),
    /// Bytes from the voice recorder
    Audio(Vec<u8>),
}

/// Result of handling one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Turns were appended; the transcript must be redrawn
    Appended { turns: usize },
    /// The event was ignored and the session is unchanged
    Skipped(SkipReason),
}

impl Outcome {
    #[must_use]
    pub const fn needs_redraw(self) -> bool {
        matches!(self, Self::Appended { .. })
    }
}

/// Session handed back by an event handler
#[derive(Debug)]
pub struct Handled {
    pub session: SessionState,
    pub outcome: Result<Outcome>,
}

impl Handled {
    const fn skipped(session: SessionState, reason: SkipReason) -> Self {
        Self {
            session,
            outcome: Ok(Outcome::Skipped(reason)),
        }
    }
}

/// Drives transcribe → complete → synthesize for each new input
pub struct Orchestrator {
    client: Arc<dyn AiClient>,
    scratch_dir: PathBuf,
}

impl Orchestrator {
    #[must_use]
    pub fn new(client: Arc<dyn AiClient>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Route an event to its handler
    pub async fn dispatch(&self, session: SessionState, event: Event) -> Handled {
        match event {
            Event::Text(text) => self.submit_text(session, &text).await,
            Event::Audio(blob) => self.submit_audio(session, &blob).await,
        }
    }

    /// Handle typed input: one completion call, reply appended as text
    pub async fn submit_text(&self, mut session: SessionState, text: &str) -> Handled {
        if let Err(reason) = session.accepts_text(text) {
            tracing::debug!(session = %session.id(), ?reason, "text submission skipped");
            return Handled::skipped(session, reason);
        }

        let span = tracing::info_span!("text_turn", session = %session.id());
        let checkpoint = session.begin(Marker::Text(text.to_string()));

        match self.text_turns(text).instrument(span).await {
            Ok(turns) => Self::commit(session, turns),
            Err(e) => {
                tracing::error!(session = %session.id(), error = %e, "text interaction failed");
                session.abort(checkpoint);
                Handled {
                    session,
                    outcome: Err(e),
                }
            }
        }
    }

    /// Handle recorded audio: transcribe, complete, then synthesize the reply
    pub async fn submit_audio(&self, mut session: SessionState, blob: &[u8]) -> Handled {
        let digest = match session.accepts_audio(blob) {
            Ok(digest) => digest,
            Err(reason) => {
                tracing::debug!(session = %session.id(), ?reason, "audio submission skipped");
                return Handled::skipped(session, reason);
            }
        };

        let span = tracing::info_span!("voice_turn", session = %session.id(), audio = %digest);
        let checkpoint = session.begin(Marker::Audio(digest));

        match self.voice_turns(blob).instrument(span).await {
            Ok(turns) => Self::commit(session, turns),
            Err(e) => {
                tracing::error!(session = %session.id(), error = %e, "voice interaction failed");
                session.abort(checkpoint);
                Handled {
                    session,
                    outcome: Err(e),
                }
            }
        }
    }

    fn commit(mut session: SessionState, turns: Vec<Turn>) -> Handled {
        let count = turns.len();
        session.commit(turns);
        tracing::info!(
            session = %session.id(),
            appended = count,
            total = session.conversation().len(),
            "turns appended"
        );
        Handled {
            session,
            outcome: Ok(Outcome::Appended { turns: count }),
        }
    }

    async fn text_turns(&self, text: &str) -> Result<Vec<Turn>> {
        let user = Turn::user(text);
        let reply = self.client.complete(text).await?;
        Ok(vec![user, Turn::assistant(reply)])
    }

    async fn voice_turns(&self, blob: &[u8]) -> Result<Vec<Turn>> {
        let format = AudioFormat::sniff(blob);
        let recording = ScratchFile::with_bytes(&self.scratch_dir, format, blob)?;
        tracing::debug!(
            path = %recording.path().display(),
            bytes = blob.len(),
            ?format,
            "recorded audio staged"
        );

        let transcript = self.client.transcribe(recording.path()).await?;
        drop(recording);
        let user = Turn::user(transcript.as_str());

        let reply = self.client.complete(&transcript).await?;

        let speech = ScratchFile::create(&self.scratch_dir, AudioFormat::Mp3)?;
        self.client.synthesize(&reply, speech.path()).await?;
        let clip = AudioClip::new(speech.format(), speech.read().await?);

        Ok(vec![user, Turn::assistant_with_audio(reply, clip)])
    }
}
