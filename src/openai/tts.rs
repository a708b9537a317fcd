//! Text-to-speech (TTS) processing

use std::path::Path;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use super::Endpoint;
use crate::{Error, Result};

/// Synthesizes speech from text
pub struct TextToSpeech {
    endpoint: Endpoint,
    model: String,
    voice: String,
    speed: f32,
}

impl TextToSpeech {
    pub(super) const fn new(endpoint: Endpoint, model: String, voice: String, speed: f32) -> Self {
        Self {
            endpoint,
            model,
            voice,
            speed,
        }
    }

    /// Synthesize text to speech, streaming MP3 audio into `dest`
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails or the file can't be written
    pub async fn synthesize_to_file(&self, text: &str, dest: &Path) -> Result<()> {
        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f32,
        }

        let request = TtsRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            speed: self.speed,
        };

        let response = self.endpoint.post("audio/speech").json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "OpenAI TTS error");
            return Err(Error::Tts(format!("OpenAI TTS error {status}: {body}")));
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0usize;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            written += chunk.len();
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        if written == 0 {
            return Err(Error::Tts("OpenAI TTS returned no audio".to_string()));
        }

        tracing::debug!(audio_bytes = written, path = %dest.display(), "speech synthesized");
        Ok(())
    }
}
