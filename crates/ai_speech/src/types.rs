//! Types for speech processing

use serde::{Deserialize, Serialize};

/// Result of a transcription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcription {
    /// Transcribed text
    pub text: String,
}

impl Transcription {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Whether no speech was recognised
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Synthesized audio with the content type the service declared
#[derive(Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl std::fmt::Debug for SynthesizedAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthesizedAudio")
            .field("data", &format_args!("[{} bytes]", self.data.len()))
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// A synthesis voice as listed by Azure Speech
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceInfo {
    /// Voice name used in SSML (e.g. `es-CO-SalomeNeural`)
    #[serde(rename = "ShortName")]
    pub short_name: String,
    /// BCP-47 locale (e.g. `es-CO`)
    #[serde(rename = "Locale")]
    pub locale: String,
    /// `Female` / `Male` / `Neutral`
    #[serde(rename = "Gender")]
    pub gender: String,
}

impl Default for VoiceInfo {
    fn default() -> Self {
        Self {
            short_name: "es-CO-SalomeNeural".to_string(),
            locale: "es-CO".to_string(),
            gender: "Female".to_string(),
        }
    }
}
