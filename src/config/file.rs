//! TOML secrets file loading
//!
//! Looks for `./.voxchat/secrets.toml` first, then
//! `~/.config/voxchat/secrets.toml`. All fields are optional; the file is a
//! partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level TOML secrets file schema
#[derive(Debug, Default, Deserialize)]
pub struct SecretsFile {
    /// `OpenAI` API key
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// `OpenAI` endpoint and model settings
    #[serde(default)]
    pub openai: OpenAiFileConfig,

    /// Server/runtime configuration
    #[serde(default)]
    pub server: ServerFileConfig,
}

/// `OpenAI` endpoint and model settings
#[derive(Debug, Default, Deserialize)]
pub struct OpenAiFileConfig {
    /// API base URL (e.g. "https://api.openai.com/v1")
    pub base_url: Option<String>,

    /// STT model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// Chat model (e.g. "gpt-3.5-turbo")
    pub llm_model: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "nova")
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    pub tts_speed: Option<f32>,
}

/// Server/runtime configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// Address to bind
    pub host: Option<String>,

    /// HTTP UI port
    pub port: Option<u16>,

    /// Directory for per-interaction scratch audio files
    pub scratch_dir: Option<String>,
}

/// Load the secrets file from the first standard path that exists
///
/// Returns `SecretsFile::default()` if no file exists.
pub fn load_secrets_file() -> SecretsFile {
    candidate_paths()
        .into_iter()
        .find(|p| p.exists())
        .map_or_else(SecretsFile::default, |p| load_from_path(&p))
}

/// Load a secrets file from an explicit path
///
/// Returns `SecretsFile::default()` if the file can't be read or parsed.
pub fn load_from_path(path: &Path) -> SecretsFile {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(file) => {
                tracing::info!(path = %path.display(), "loaded secrets file");
                file
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse secrets file, using defaults"
                );
                SecretsFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read secrets file"
            );
            SecretsFile::default()
        }
    }
}

/// Secrets file search order: working directory, then user config dir
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".voxchat").join("secrets.toml")];
    if let Some(dirs) = directories::BaseDirs::new() {
        paths.push(dirs.config_dir().join("voxchat").join("secrets.toml"));
    }
    paths
}
