//! voxchat - Voice and text chatbot backed by `OpenAI`
//!
//! A single chat session accepts typed or recorded input, runs it through
//! speech-to-text, chat completion and text-to-speech, and renders the
//! transcript with auto-playing audio replies.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │            Browser UI  /  terminal chat              │
//! └────────────────────┬────────────────────────────────┘
//!                      │ Event::Text / Event::Audio
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Orchestrator                         │
//! │   SessionState  │  Scratch files  │  render()       │
//! └────────────────────┬────────────────────────────────┘
//!                      │ AiClient
//! ┌────────────────────▼────────────────────────────────┐
//! │                  OpenAI API                          │
//! │   Whisper  │  Chat completions  │  TTS              │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod audio;
pub mod config;
pub mod conversation;
pub mod error;
pub mod openai;
pub mod render;

pub use audio::AudioFormat;
pub use config::Config;
pub use conversation::{
    AudioClip, Conversation, Event, Handled, Orchestrator, Outcome, Role, SessionState,
    SkipReason, Turn,
};
pub use error::{Error, Result};
pub use openai::{AiClient, OpenAiClient};
pub use render::{DisplayUnit, render};
