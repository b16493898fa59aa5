//! Stand-in adapter for providers whose credentials are missing
//!
//! Lets the bridge start with a partial configuration: every call fails with
//! `ApplicationError::Configuration` carrying the reason the real adapter
//! could not be built, which the dispatcher turns into the generic failure
//! reply for that message only.

use application::error::ApplicationError;
use application::ports::{
    AsciiArtPort, AsciiArtRequest, MediaPayload, SynthesisPort, TranscriptionPort, VisionPort,
};
use async_trait::async_trait;
use domain::{MimeType, VoiceSelection};

/// Adapter that rejects every call with a configuration error
#[derive(Debug, Clone)]
pub struct UnconfiguredAdapter {
    service: &'static str,
    reason: String,
}

impl UnconfiguredAdapter {
    #[must_use]
    pub fn new(service: &'static str, reason: impl Into<String>) -> Self {
        Self {
            service,
            reason: reason.into(),
        }
    }

    fn error(&self) -> ApplicationError {
        ApplicationError::Configuration(format!(
            "{} is not configured: {}",
            self.service, self.reason
        ))
    }
}

#[async_trait]
impl TranscriptionPort for UnconfiguredAdapter {
    async fn transcribe(
        &self,
        _audio: Vec<u8>,
        _mime_type: &MimeType,
    ) -> Result<String, ApplicationError> {
        Err(self.error())
    }
}

#[async_trait]
impl SynthesisPort for UnconfiguredAdapter {
    async fn synthesize(
        &self,
        _text: &str,
        _voice: &VoiceSelection,
    ) -> Result<MediaPayload, ApplicationError> {
        Err(self.error())
    }

    async fn list_voices(&self) -> Result<Vec<VoiceSelection>, ApplicationError> {
        Err(self.error())
    }
}

#[async_trait]
impl VisionPort for UnconfiguredAdapter {
    async fn analyze(
        &self,
        _image: Vec<u8>,
        _mime_type: &MimeType,
    ) -> Result<String, ApplicationError> {
        Err(self.error())
    }

    async fn remove_background(
        &self,
        _image: Vec<u8>,
        _mime_type: &MimeType,
    ) -> Result<MediaPayload, ApplicationError> {
        Err(self.error())
    }
}

#[async_trait]
impl AsciiArtPort for UnconfiguredAdapter {
    async fn render(&self, _request: &AsciiArtRequest) -> Result<String, ApplicationError> {
        Err(self.error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_call_reports_the_reason() {
        let adapter = UnconfiguredAdapter::new("Azure Speech", "azure_speech_key is required");

        let err = adapter.list_voices().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Azure Speech is not configured: azure_speech_key is required"
        );
        assert!(err.is_system_failure());

        let err = adapter
            .transcribe(vec![], &MimeType::new("audio/ogg"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }
}
