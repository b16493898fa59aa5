//! Azure Speech Provider
//!
//! Implements `TextToSpeech` against the Azure Speech REST API: SSML
//! synthesis on `/cognitiveservices/v1` and the voice catalogue on
//! `/cognitiveservices/voices/list`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, header::CONTENT_TYPE};
use tracing::{debug, instrument, warn};

use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::ports::TextToSpeech;
use crate::ssml::build_ssml;
use crate::types::{SynthesizedAudio, VoiceInfo};

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";
const SSML_CONTENT_TYPE: &str = "application/ssml+xml; charset=utf-8";
const DEFAULT_AUDIO_TYPE: &str = "audio/mpeg";

/// Azure Speech text-to-speech provider
#[derive(Debug, Clone)]
pub struct AzureSpeechProvider {
    client: Client,
    base_url: String,
    config: SpeechConfig,
}

impl AzureSpeechProvider {
    /// Create a new Azure speech provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if key or region are missing.
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        config
            .validate_synthesis()
            .map_err(SpeechError::Configuration)?;
        let base_url = config.azure_base_url().ok_or_else(|| {
            SpeechError::Configuration("Azure Speech region is required".to_string())
        })?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(
            SUBSCRIPTION_KEY_HEADER,
            self.config.azure_speech_key.as_deref().unwrap_or_default(),
        )
    }

    fn synthesis_url(&self) -> String {
        format!("{}/cognitiveservices/v1", self.base_url)
    }

    fn voices_url(&self) -> String {
        format!("{}/cognitiveservices/voices/list", self.base_url)
    }
}

fn failure(status: StatusCode, body: String) -> SpeechError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        SpeechError::RateLimited
    } else {
        SpeechError::RequestFailed(format!("HTTP {status}: {body}"))
    }
}

#[async_trait]
impl TextToSpeech for AzureSpeechProvider {
    #[instrument(skip(self, text), fields(text_len = text.len(), voice = %voice.short_name))]
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceInfo,
    ) -> Result<SynthesizedAudio, SpeechError> {
        let ssml = build_ssml(text, voice);

        let response = self
            .authorized(self.client.post(self.synthesis_url()))
            .header(CONTENT_TYPE, SSML_CONTENT_TYPE)
            .header(OUTPUT_FORMAT_HEADER, &self.config.output_format)
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .body(ssml)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Azure synthesis failed");
            return Err(match failure(status, body) {
                SpeechError::RequestFailed(msg) => SpeechError::SynthesisFailed(msg),
                other => other,
            });
        }

        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_AUDIO_TYPE)
            .to_string();

        let data = response
            .bytes()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to read audio: {e}")))?
            .to_vec();

        if data.is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Service returned no audio".to_string(),
            ));
        }

        debug!(audio_size = data.len(), mime_type = %mime_type, "Synthesis complete");
        Ok(SynthesizedAudio { data, mime_type })
    }

    #[instrument(skip(self))]
    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError> {
        let response = self
            .authorized(self.client.get(self.voices_url()))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(failure(status, body));
        }

        let voices: Vec<VoiceInfo> = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to parse voices: {e}")))?;

        debug!(count = voices.len(), "Voices listed");
        Ok(voices)
    }
}
