//! Audio container detection for recorded blobs
//!
//! The transcription API picks a decoder from the uploaded file name, so the
//! scratch file has to carry the right extension.

/// Audio container formats accepted by the transcription API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
    Webm,
    Ogg,
    Mp4,
    Flac,
}

impl AudioFormat {
    /// Detect the container from leading magic bytes
    ///
    /// Falls back to MP3 when nothing matches.
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Self {
        match bytes {
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E', ..] => Self::Wav,
            [0x1A, 0x45, 0xDF, 0xA3, ..] => Self::Webm,
            [b'O', b'g', b'g', b'S', ..] => Self::Ogg,
            [b'f', b'L', b'a', b'C', ..] => Self::Flac,
            [_, _, _, _, b'f', b't', b'y', b'p', ..] => Self::Mp4,
            // ID3 tags and bare MPEG frames land here too
            _ => Self::Mp3,
        }
    }

    /// File extension without the dot
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Webm => "webm",
            Self::Ogg => "ogg",
            Self::Mp4 => "m4a",
            Self::Flac => "flac",
        }
    }

    /// MIME type for uploads and data URLs
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Webm => "audio/webm",
            Self::Ogg => "audio/ogg",
            Self::Mp4 => "audio/mp4",
            Self::Flac => "audio/flac",
        }
    }

    /// Format for a file extension, case-insensitive
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" | "mpeg" | "mpga" => Some(Self::Mp3),
            "wav" => Some(Self::Wav),
            "webm" => Some(Self::Webm),
            "ogg" | "oga" => Some(Self::Ogg),
            "m4a" | "mp4" => Some(Self::Mp4),
            "flac" => Some(Self::Flac),
            _ => None,
        }
    }
}
