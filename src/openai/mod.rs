//! `OpenAI` API client wrapper
//!
//! The orchestrator only sees the [`AiClient`] trait; [`OpenAiClient`] is the
//! production implementation built from three single-purpose clients.

mod completion;
mod stt;
mod tts;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

pub use completion::ChatCompletion;
pub use stt::SpeechToText;
pub use tts::TextToSpeech;

use crate::config::OpenAiConfig;
use crate::{Error, Result};

/// External speech and language services used by a chat session
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Transcribe the audio file at `audio` to text
    async fn transcribe(&self, audio: &Path) -> Result<String>;

    /// Produce a reply to a single user message
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Synthesize `text` to speech, writing MP3 audio to `dest`
    async fn synthesize(&self, text: &str, dest: &Path) -> Result<()>;
}

/// Shared request context for the `OpenAI` endpoints
#[derive(Clone)]
struct Endpoint {
    client: reqwest::Client,
    api_key: Arc<SecretString>,
    base_url: String,
}

impl Endpoint {
    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
    }
}

/// `OpenAI`-backed [`AiClient`]
pub struct OpenAiClient {
    stt: SpeechToText,
    chat: ChatCompletion,
    tts: TextToSpeech,
}

impl OpenAiClient {
    /// Create a client for all three endpoints
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(api_key: SecretString, config: &OpenAiConfig) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::MissingCredential);
        }

        let endpoint = Endpoint {
            client: reqwest::Client::new(),
            api_key: Arc::new(api_key),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        };

        Ok(Self {
            stt: SpeechToText::new(endpoint.clone(), config.stt_model.clone()),
            chat: ChatCompletion::new(endpoint.clone(), config.llm_model.clone()),
            tts: TextToSpeech::new(
                endpoint,
                config.tts_model.clone(),
                config.tts_voice.clone(),
                config.tts_speed,
            ),
        })
    }
}

#[async_trait]
impl AiClient for OpenAiClient {
    async fn transcribe(&self, audio: &Path) -> Result<String> {
        self.stt.transcribe(audio).await
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.chat.complete(prompt).await
    }

    async fn synthesize(&self, text: &str, dest: &Path) -> Result<()> {
        self.tts.synthesize_to_file(text, dest).await
    }
}
