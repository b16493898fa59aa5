//! Speech adapters - implement the transcription and synthesis ports using ai_speech

use std::sync::Arc;

use ai_speech::{
    AzureSpeechProvider, OpenAISpeechProvider, SpeechConfig, SpeechError, SpeechToText,
    TextToSpeech, VoiceInfo,
};
use application::error::ApplicationError;
use application::ports::{MediaPayload, SynthesisPort, TranscriptionPort};
use async_trait::async_trait;
use domain::{MimeType, VoiceSelection};
use tracing::{debug, instrument};

/// Map speech provider errors to application errors
fn map_error(err: SpeechError) -> ApplicationError {
    match err {
        SpeechError::Configuration(e) => ApplicationError::Configuration(e),
        SpeechError::ConnectionFailed(e) | SpeechError::RequestFailed(e) => {
            ApplicationError::ExternalService(e)
        },
        SpeechError::InvalidAudio(e) => {
            ApplicationError::ExternalService(format!("Invalid audio: {e}"))
        },
        SpeechError::TranscriptionFailed(e) => {
            ApplicationError::ExternalService(format!("Transcription failed: {e}"))
        },
        SpeechError::SynthesisFailed(e) => {
            ApplicationError::ExternalService(format!("Synthesis failed: {e}"))
        },
        SpeechError::InvalidResponse(e) => {
            ApplicationError::ExternalService(format!("Invalid response: {e}"))
        },
        SpeechError::Timeout => {
            ApplicationError::ExternalService("Speech service timeout".to_string())
        },
        SpeechError::RateLimited => {
            ApplicationError::ExternalService("Speech service rate limit exceeded".to_string())
        },
    }
}

/// Adapter for speech-to-text
pub struct TranscriptionAdapter {
    provider: Arc<dyn SpeechToText>,
}

impl std::fmt::Debug for TranscriptionAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriptionAdapter")
            .finish_non_exhaustive()
    }
}

impl TranscriptionAdapter {
    /// Create an adapter backed by the OpenAI transcription API
    ///
    /// # Errors
    ///
    /// Returns an error if the provider configuration is incomplete.
    pub fn openai(config: SpeechConfig) -> Result<Self, ApplicationError> {
        let provider = OpenAISpeechProvider::new(config).map_err(map_error)?;
        Ok(Self::new(Arc::new(provider)))
    }

    /// Create an adapter over any speech-to-text provider
    #[must_use]
    pub fn new(provider: Arc<dyn SpeechToText>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl TranscriptionPort for TranscriptionAdapter {
    #[instrument(skip(self, audio), fields(mime_type = %mime_type, size = audio.len()))]
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        mime_type: &MimeType,
    ) -> Result<String, ApplicationError> {
        let transcription = self
            .provider
            .transcribe(audio, mime_type.as_str())
            .await
            .map_err(map_error)?;

        debug!(text_len = transcription.text.len(), "Transcription complete");
        Ok(transcription.text)
    }
}

/// Adapter for text-to-speech
pub struct SynthesisAdapter {
    provider: Arc<dyn TextToSpeech>,
}

impl std::fmt::Debug for SynthesisAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthesisAdapter").finish_non_exhaustive()
    }
}

impl SynthesisAdapter {
    /// Create an adapter backed by Azure Speech
    ///
    /// # Errors
    ///
    /// Returns an error if the provider configuration is incomplete.
    pub fn azure(config: SpeechConfig) -> Result<Self, ApplicationError> {
        let provider = AzureSpeechProvider::new(config).map_err(map_error)?;
        Ok(Self::new(Arc::new(provider)))
    }

    /// Create an adapter over any text-to-speech provider
    #[must_use]
    pub fn new(provider: Arc<dyn TextToSpeech>) -> Self {
        Self { provider }
    }
}

fn to_voice_info(voice: &VoiceSelection) -> VoiceInfo {
    VoiceInfo {
        short_name: voice.short_name.clone(),
        locale: voice.locale.clone(),
        gender: voice.gender.clone(),
    }
}

fn to_voice_selection(voice: VoiceInfo) -> VoiceSelection {
    VoiceSelection::new(voice.short_name, voice.locale, voice.gender)
}

#[async_trait]
impl SynthesisPort for SynthesisAdapter {
    #[instrument(skip(self, text), fields(text_len = text.len(), voice = %voice.short_name))]
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceSelection,
    ) -> Result<MediaPayload, ApplicationError> {
        let audio = self
            .provider
            .synthesize(text, &to_voice_info(voice))
            .await
            .map_err(map_error)?;

        debug!(size = audio.data.len(), mime_type = %audio.mime_type, "Synthesis complete");
        Ok(MediaPayload::new(audio.data, audio.mime_type.as_str()))
    }

    #[instrument(skip(self))]
    async fn list_voices(&self) -> Result<Vec<VoiceSelection>, ApplicationError> {
        let voices = self.provider.list_voices().await.map_err(map_error)?;
        debug!(count = voices.len(), "Voices listed");
        Ok(voices.into_iter().map(to_voice_selection).collect())
    }
}
