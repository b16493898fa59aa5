//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server and log output
//! - `messenger`: WhatsApp Graph API credentials and webhook tokens
//! - `storage`: object storage and the per-sender key-value store
//! - `dispatcher`: reply pacing and the default voice
//!
//! Speech and vision sections reuse the provider crates' own config types.

mod dispatcher;
mod messenger;
mod server;
mod storage;

use ai_speech::SpeechConfig;
use ai_vision::VisionConfig;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use dispatcher::DispatcherAppConfig;
pub use messenger::WhatsAppConfig;
pub use server::{ServerConfig, TelemetryAppConfig};
pub use storage::{StorageConfig, StoreConfig};

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// WhatsApp configuration
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// Transcription and synthesis providers
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Image analysis and ASCII-art providers
    #[serde(default)]
    pub vision: VisionConfig,

    /// Object storage for media backups and ASCII-art staging
    #[serde(default)]
    pub storage: StorageConfig,

    /// Per-sender key-value store
    #[serde(default)]
    pub store: StoreConfig,

    /// Dispatcher behaviour
    #[serde(default)]
    pub dispatcher: DispatcherAppConfig,

    /// Log output
    #[serde(default)]
    pub telemetry: TelemetryAppConfig,
}

impl AppConfig {
    /// Load configuration from an optional `config` file and the process environment
    ///
    /// Variables use the `WABRIDGE_` prefix with `__` between sections, e.g.
    /// `WABRIDGE_WHATSAPP__ACCESS_TOKEN`. Unprefixed legacy variables such as
    /// `GRAPH_API_TOKEN` fill whatever is still unset afterwards.
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut config = Self::build(None)?;
        config.apply_legacy_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from an explicit variable map instead of the process environment
    pub fn load_from(vars: config::Map<String, String>) -> Result<Self, config::ConfigError> {
        let lookup = vars.clone();
        let mut config = Self::build(Some(vars))?;
        config.apply_legacy_env(|name| lookup.get(name).cloned());
        Ok(config)
    }

    fn build(vars: Option<config::Map<String, String>>) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("WABRIDGE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(vars),
            );

        builder.build()?.try_deserialize()
    }

    /// Fill unset fields from the unprefixed variable names of earlier deployments
    pub fn apply_legacy_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        fill_secret(&mut self.whatsapp.access_token, get("GRAPH_API_TOKEN"));
        fill_secret(&mut self.whatsapp.verify_token, get("VERIFICATION_TOKEN"));
        fill(&mut self.speech.openai_api_key, get("OPENAI_API_KEY"));
        fill(&mut self.speech.azure_speech_key, get("MS_SPEECH_KEY"));
        fill(&mut self.speech.azure_speech_region, get("MS_SPEECH_REGION"));
        fill(&mut self.vision.key, get("MS_VISION_KEY"));
        fill(&mut self.vision.endpoint, get("MS_VISION_ENDPOINT"));
        fill(&mut self.vision.functions_endpoint, get("FUNCTIONS_ENDPOINT"));
        fill(&mut self.vision.functions_namespace, get("FUNCTIONS_NAMESPACE"));
        fill(&mut self.storage.bucket, get("SPACES_NAME"));
        fill_secret(&mut self.storage.access_key, get("SPACES_KEY"));
        fill_secret(&mut self.storage.secret_key, get("SPACES_SECRET"));
        fill(&mut self.store.redis_url, get("REDIS_URL"));
    }
}

fn fill(slot: &mut Option<String>, value: Option<String>) {
    if slot.is_none() {
        *slot = value;
    }
}

fn fill_secret(slot: &mut Option<SecretString>, value: Option<String>) {
    if slot.is_none() && value.is_some() {
        debug!("Using legacy environment variable for a secret");
        *slot = value.map(SecretString::from);
    }
}
