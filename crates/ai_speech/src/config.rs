//! Configuration for speech processing

use serde::{Deserialize, Serialize};

/// Configuration for the transcription and synthesis services
///
/// `Debug` output redacts both API keys.
#[derive(Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// OpenAI API key (transcription)
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// OpenAI API base URL (for custom endpoints)
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// Speech-to-text model
    #[serde(default = "default_stt_model")]
    pub stt_model: String,

    /// Sampling temperature sent with transcriptions
    #[serde(default = "default_temperature")]
    pub stt_temperature: f32,

    /// Azure Speech subscription key (synthesis)
    #[serde(default)]
    pub azure_speech_key: Option<String>,

    /// Azure Speech region (e.g. `eastus`)
    #[serde(default)]
    pub azure_speech_region: Option<String>,

    /// Override for the Azure Speech base URL, mainly for tests
    #[serde(default)]
    pub azure_base_url: Option<String>,

    /// Azure output format header value
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// User agent sent to Azure Speech
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl std::fmt::Debug for SpeechConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redacted = |key: Option<&String>| key.map(|_| "[REDACTED]");
        f.debug_struct("SpeechConfig")
            .field("openai_api_key", &redacted(self.openai_api_key.as_ref()))
            .field("openai_base_url", &self.openai_base_url)
            .field("stt_model", &self.stt_model)
            .field("stt_temperature", &self.stt_temperature)
            .field("azure_speech_key", &redacted(self.azure_speech_key.as_ref()))
            .field("azure_speech_region", &self.azure_speech_region)
            .field("azure_base_url", &self.azure_base_url)
            .field("output_format", &self.output_format)
            .field("user_agent", &self.user_agent)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_stt_model() -> String {
    "whisper-1".to_string()
}

const fn default_temperature() -> f32 {
    0.7
}

fn default_output_format() -> String {
    "audio-16khz-128kbitrate-mono-mp3".to_string()
}

fn default_user_agent() -> String {
    "wabridge:speech:v1".to_string()
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: default_openai_base_url(),
            stt_model: default_stt_model(),
            stt_temperature: default_temperature(),
            azure_speech_key: None,
            azure_speech_region: None,
            azure_base_url: None,
            output_format: default_output_format(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SpeechConfig {
    /// Base URL of the Azure Speech TTS service
    ///
    /// `https://{region}.tts.speech.microsoft.com` unless overridden.
    #[must_use]
    pub fn azure_base_url(&self) -> Option<String> {
        self.azure_base_url
            .as_ref()
            .map(|url| url.trim_end_matches('/').to_string())
            .or_else(|| {
                self.azure_speech_region
                    .as_ref()
                    .map(|region| format!("https://{region}.tts.speech.microsoft.com"))
            })
    }

    /// Validate the settings needed for transcription
    pub fn validate_transcription(&self) -> Result<(), String> {
        if self.openai_api_key.as_deref().is_none_or(str::is_empty) {
            return Err("OpenAI API key is required for transcription".to_string());
        }
        if !(0.0..=1.0).contains(&self.stt_temperature) {
            return Err(format!(
                "Temperature must be between 0.0 and 1.0, got {}",
                self.stt_temperature
            ));
        }
        self.validate_timeout()
    }

    /// Validate the settings needed for synthesis
    pub fn validate_synthesis(&self) -> Result<(), String> {
        if self.azure_speech_key.as_deref().is_none_or(str::is_empty) {
            return Err("Azure Speech key is required for synthesis".to_string());
        }
        if self.azure_base_url().is_none() {
            return Err("Azure Speech region is required for synthesis".to_string());
        }
        self.validate_timeout()
    }

    fn validate_timeout(&self) -> Result<(), String> {
        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> SpeechConfig {
        SpeechConfig {
            openai_api_key: Some("sk-test".into()),
            azure_speech_key: Some("az-test".into()),
            azure_speech_region: Some("eastus".into()),
            ..Default::default()
        }
    }

    #[test]
    fn default_config_has_expected_values() {
        let config = SpeechConfig::default();

        assert!(config.openai_api_key.is_none());
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert_eq!(config.stt_model, "whisper-1");
        assert!((config.stt_temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.output_format, "audio-16khz-128kbitrate-mono-mp3");
        assert_eq!(config.timeout_ms, 30000);
    }

    #[test]
    fn debug_output_redacts_keys() {
        let debug = format!("{:?}", configured());
        assert!(!debug.contains("sk-test"));
        assert!(!debug.contains("az-test"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("eastus"));
    }

    #[test]
    fn azure_url_is_derived_from_region() {
        assert_eq!(
            configured().azure_base_url().as_deref(),
            Some("https://eastus.tts.speech.microsoft.com")
        );
    }

    #[test]
    fn azure_url_override_wins() {
        let config = SpeechConfig {
            azure_base_url: Some("http://127.0.0.1:9000/".into()),
            ..configured()
        };
        assert_eq!(config.azure_base_url().as_deref(), Some("http://127.0.0.1:9000"));
    }

    #[test]
    fn validate_requires_keys() {
        let config = SpeechConfig::default();
        assert!(config.validate_transcription().is_err());
        assert!(config.validate_synthesis().is_err());

        assert!(configured().validate_transcription().is_ok());
        assert!(configured().validate_synthesis().is_ok());
    }

    #[test]
    fn synthesis_requires_region() {
        let config = SpeechConfig {
            azure_speech_region: None,
            ..configured()
        };
        assert!(config.validate_synthesis().is_err());
    }

    #[test]
    fn validate_rejects_bad_temperature_and_timeout() {
        let mut config = configured();
        config.stt_temperature = 1.5;
        assert!(config.validate_transcription().is_err());

        let mut config = configured();
        config.timeout_ms = 0;
        assert!(config.validate_transcription().is_err());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: SpeechConfig =
            serde_json::from_str(r#"{"openai_api_key": "sk", "azure_speech_region": "westeurope"}"#)
                .unwrap();
        assert_eq!(config.stt_model, "whisper-1");
        assert_eq!(config.azure_speech_region.as_deref(), Some("westeurope"));
    }
}
