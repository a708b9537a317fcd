//! Configuration management for voxchat
//!
//! Priority for each setting: environment variable, then the secrets file,
//! then built-in defaults. The `OpenAI` API key has no default; a session
//! cannot start without it.

pub mod file;

use std::path::PathBuf;

use secrecy::SecretString;

use crate::{Error, Result};
pub use file::SecretsFile;

/// Default `OpenAI` API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default HTTP UI port
pub const DEFAULT_PORT: u16 = 8501;

/// voxchat configuration
#[derive(Debug)]
pub struct Config {
    /// `OpenAI` API key (from `openai_api_key` or `OPENAI_API_KEY`)
    pub openai_api_key: SecretString,

    /// `OpenAI` endpoint and model settings
    pub openai: OpenAiConfig,

    /// HTTP UI configuration
    pub server: ServerConfig,
}

/// `OpenAI` endpoint and model settings
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API base URL without trailing slash
    pub base_url: String,

    /// STT model (e.g. "whisper-1")
    pub stt_model: String,

    /// Chat completion model (e.g. "gpt-3.5-turbo")
    pub llm_model: String,

    /// TTS model (e.g. "tts-1")
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            stt_model: "whisper-1".to_string(),
            llm_model: "gpt-3.5-turbo".to_string(),
            tts_model: "tts-1".to_string(),
            tts_voice: "nova".to_string(),
            tts_speed: 1.0,
        }
    }
}

/// HTTP UI configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Directory for per-interaction scratch audio files
    pub scratch_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            scratch_dir: std::env::temp_dir(),
        }
    }
}

impl Config {
    /// Load configuration from the secrets file and the process environment
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingCredential` if no API key is configured, or
    /// `Error::Config` if a setting is invalid
    pub fn load() -> Result<Self> {
        Self::from_sources(file::load_secrets_file(), |key| std::env::var(key).ok())
    }

    /// Build configuration from a parsed secrets file and an env lookup
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingCredential` if no API key is configured, or
    /// `Error::Config` if a setting is invalid
    pub fn from_sources<F>(file: SecretsFile, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let nonblank = |k: &String| !k.trim().is_empty();
        let api_key = env("OPENAI_API_KEY")
            .filter(nonblank)
            .or_else(|| file.openai_api_key.filter(nonblank))
            .ok_or(Error::MissingCredential)?;

        let defaults = OpenAiConfig::default();
        let base_url = env("VOXCHAT_BASE_URL")
            .or(file.openai.base_url)
            .unwrap_or(defaults.base_url);
        url::Url::parse(&base_url)
            .map_err(|e| Error::Config(format!("invalid base URL {base_url:?}: {e}")))?;

        let tts_speed = match env("VOXCHAT_TTS_SPEED") {
            Some(raw) => raw
                .parse::<f32>()
                .map_err(|e| Error::Config(format!("invalid VOXCHAT_TTS_SPEED {raw:?}: {e}")))?,
            None => file.openai.tts_speed.unwrap_or(defaults.tts_speed),
        };
        if !(0.25..=4.0).contains(&tts_speed) {
            return Err(Error::Config(format!(
                "TTS speed must be between 0.25 and 4.0, got {tts_speed}"
            )));
        }

        let openai = OpenAiConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            stt_model: env("VOXCHAT_STT_MODEL")
                .or(file.openai.stt_model)
                .unwrap_or(defaults.stt_model),
            llm_model: env("VOXCHAT_LLM_MODEL")
                .or(file.openai.llm_model)
                .unwrap_or(defaults.llm_model),
            tts_model: env("VOXCHAT_TTS_MODEL")
                .or(file.openai.tts_model)
                .unwrap_or(defaults.tts_model),
            tts_voice: env("VOXCHAT_TTS_VOICE")
                .or(file.openai.tts_voice)
                .unwrap_or(defaults.tts_voice),
            tts_speed,
        };

        let server_defaults = ServerConfig::default();
        let port = match env("VOXCHAT_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| Error::Config(format!("invalid VOXCHAT_PORT {raw:?}: {e}")))?,
            None => file.server.port.unwrap_or(server_defaults.port),
        };
        let server = ServerConfig {
            host: env("VOXCHAT_HOST")
                .or(file.server.host)
                .unwrap_or(server_defaults.host),
            port,
            scratch_dir: env("VOXCHAT_SCRATCH_DIR")
                .or(file.server.scratch_dir)
                .map_or(server_defaults.scratch_dir, PathBuf::from),
        };

        Ok(Self {
            openai_api_key: SecretString::from(api_key),
            openai,
            server,
        })
    }
}
