//! Speech-to-text (STT) processing

use std::path::Path;

use super::Endpoint;
use crate::audio::AudioFormat;
use crate::{Error, Result};

/// Response from `OpenAI` Whisper transcription API
#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Transcribes speech to text
pub struct SpeechToText {
    endpoint: Endpoint,
    model: String,
}

impl SpeechToText {
    pub(super) const fn new(endpoint: Endpoint, model: String) -> Self {
        Self { endpoint, model }
    }

    /// Transcribe an audio file to text
    ///
    /// The file extension selects the upload MIME type.
    ///
    /// # Errors
    ///
    /// Returns error if the file can't be read or transcription fails
    pub async fn transcribe(&self, path: &Path) -> Result<String> {
        let audio = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.mp3")
            .to_string();
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(AudioFormat::from_extension)
            .unwrap_or_else(|| AudioFormat::sniff(&audio));

        tracing::debug!(
            audio_bytes = audio.len(),
            file = %file_name,
            mime = format.mime_type(),
            "starting Whisper transcription"
        );

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio)
                    .file_name(file_name)
                    .mime_str(format.mime_type())
                    .map_err(|e| Error::Stt(e.to_string()))?,
            )
            .text("model", self.model.clone());

        let response = self
            .endpoint
            .post("audio/transcriptions")
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Whisper request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Whisper API error");
            return Err(Error::Stt(format!("Whisper API error {status}: {body}")));
        }

        let result: WhisperResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse response");
            e
        })?;

        tracing::info!(transcript = %result.text, "transcription complete");
        Ok(result.text)
    }
}
