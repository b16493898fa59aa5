//! Port definitions for speech processing
//!
//! Defines the traits (ports) that speech processing adapters must implement.

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::types::{SynthesizedAudio, Transcription, VoiceInfo};

/// Port for Speech-to-Text (STT) implementations
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe audio bytes of the given mime type
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` on transport failures and non-2xx responses.
    async fn transcribe(&self, audio: Vec<u8>, mime_type: &str)
    -> Result<Transcription, SpeechError>;
}

/// Port for Text-to-Speech (TTS) implementations
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize text with the given voice
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` on transport failures and non-2xx responses.
    async fn synthesize(&self, text: &str, voice: &VoiceInfo)
    -> Result<SynthesizedAudio, SpeechError>;

    /// List the voices the service offers
    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError>;
}
