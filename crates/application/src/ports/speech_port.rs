//! Speech ports - transcription (speech-to-text) and synthesis (text-to-speech)

use async_trait::async_trait;
use domain::{MimeType, VoiceSelection};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;
use crate::ports::MediaPayload;

/// Port for speech-to-text
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TranscriptionPort: Send + Sync {
    /// Transcribe audio bytes of the given mime type
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        mime_type: &MimeType,
    ) -> Result<String, ApplicationError>;
}

/// Port for text-to-speech
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SynthesisPort: Send + Sync {
    /// Synthesize `text` with `voice`, returning audio and its mime type
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceSelection,
    ) -> Result<MediaPayload, ApplicationError>;

    /// All voices the provider offers
    async fn list_voices(&self) -> Result<Vec<VoiceSelection>, ApplicationError>;
}
