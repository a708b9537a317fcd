//! Per-interaction scratch files
//!
//! Each file gets a unique name and is removed when the guard drops.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::Result;
use crate::audio::AudioFormat;

/// Uniquely named temporary audio file, deleted on drop
#[derive(Debug)]
pub struct ScratchFile {
    file: NamedTempFile,
    format: AudioFormat,
}

impl ScratchFile {
    /// Create an empty scratch file in `dir`
    ///
    /// # Errors
    ///
    /// Returns error if the file can't be created
    pub fn create(dir: &Path, format: AudioFormat) -> Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("voxchat-")
            .suffix(&format!(".{}", format.extension()))
            .tempfile_in(dir)?;
        Ok(Self { file, format })
    }

    /// Create a scratch file in `dir` holding `bytes`
    ///
    /// # Errors
    ///
    /// Returns error if the file can't be created or written
    pub fn with_bytes(dir: &Path, format: AudioFormat, bytes: &[u8]) -> Result<Self> {
        let mut scratch = Self::create(dir, format)?;
        scratch.file.write_all(bytes)?;
        scratch.file.flush()?;
        Ok(scratch)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    #[must_use]
    pub const fn format(&self) -> AudioFormat {
        self.format
    }

    /// Read the current file contents
    ///
    /// # Errors
    ///
    /// Returns error if the file can't be read
    pub async fn read(&self) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(self.path()).await?)
    }
}
