//! Shared test utilities

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use voxchat::{AiClient, Error, Result};

/// Bytes the mock writes as synthesized speech
pub const MOCK_SPEECH: &[u8] = b"ID3mock-speech";

/// A small WAV-looking recording
pub const WAV_BLOB: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt \x10\x00\x00\x00";

/// One recorded call against the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Transcribe {
        path: PathBuf,
        bytes: Vec<u8>,
    },
    Complete(String),
    Synthesize {
        text: String,
        path: PathBuf,
    },
}

/// Stage of an interaction the mock can fail at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Transcribe,
    Complete,
    Synthesize,
}

/// Pauses `complete` until released
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

/// Scripted [`AiClient`] that records every call
pub struct MockClient {
    calls: Mutex<Vec<Call>>,
    transcript: String,
    fail_at: Mutex<Option<Stage>>,
    gate: Option<Arc<Gate>>,
}

impl MockClient {
    pub fn new(transcript: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            transcript: transcript.to_string(),
            fail_at: Mutex::new(None),
            gate: None,
        }
    }

    pub fn gated(transcript: &str, gate: Arc<Gate>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(transcript)
        }
    }

    pub fn fail_at(&self, stage: Option<Stage>) {
        *self.fail_at.lock().unwrap() = stage;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn should_fail(&self, stage: Stage) -> bool {
        *self.fail_at.lock().unwrap() == Some(stage)
    }
}

/// Reply the mock produces for a prompt
pub fn reply_to(prompt: &str) -> String {
    format!("reply to {prompt}")
}

#[async_trait]
impl AiClient for MockClient {
    async fn transcribe(&self, audio: &Path) -> Result<String> {
        let bytes = tokio::fs::read(audio).await?;
        self.record(Call::Transcribe {
            path: audio.to_path_buf(),
            bytes,
        });
        if self.should_fail(Stage::Transcribe) {
            return Err(Error::Stt("mock transcription failure".to_string()));
        }
        Ok(self.transcript.clone())
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.record(Call::Complete(prompt.to_string()));
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        if self.should_fail(Stage::Complete) {
            return Err(Error::Completion("mock completion failure".to_string()));
        }
        Ok(reply_to(prompt))
    }

    async fn synthesize(&self, text: &str, dest: &Path) -> Result<()> {
        self.record(Call::Synthesize {
            text: text.to_string(),
            path: dest.to_path_buf(),
        });
        if self.should_fail(Stage::Synthesize) {
            return Err(Error::Tts("mock synthesis failure".to_string()));
        }
        tokio::fs::write(dest, MOCK_SPEECH).await?;
        Ok(())
    }
}

/// Number of entries left in a scratch directory
pub fn scratch_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map_or(0, Iterator::count)
}
