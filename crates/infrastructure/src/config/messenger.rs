//! WhatsApp configuration: Graph API credentials and webhook tokens.

use integration_whatsapp::WhatsAppClientConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// WhatsApp integration configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    /// Meta Graph API access token (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub access_token: Option<SecretString>,

    /// Token Meta echoes back during webhook subscription (sensitive)
    #[serde(default, skip_serializing)]
    pub verify_token: Option<SecretString>,

    /// App secret for `X-Hub-Signature-256` verification (sensitive)
    ///
    /// When unset, webhook bodies are accepted unsigned.
    #[serde(default, skip_serializing)]
    pub app_secret: Option<SecretString>,

    /// Graph API version for messages and media metadata (default: v19.0)
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Graph API version for media uploads (default: v21.0)
    #[serde(default = "default_media_api_version")]
    pub media_api_version: String,

    /// Graph API base URL
    #[serde(default = "default_graph_base_url")]
    pub graph_base_url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl std::fmt::Debug for WhatsAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppConfig")
            .field("access_token", &redacted(self.access_token.as_ref()))
            .field("verify_token", &redacted(self.verify_token.as_ref()))
            .field("app_secret", &redacted(self.app_secret.as_ref()))
            .field("api_version", &self.api_version)
            .field("media_api_version", &self.media_api_version)
            .field("graph_base_url", &self.graph_base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

pub(crate) fn redacted(secret: Option<&SecretString>) -> Option<&'static str> {
    secret.map(|_| "[REDACTED]")
}

fn default_api_version() -> String {
    "v19.0".to_string()
}

fn default_media_api_version() -> String {
    "v21.0".to_string()
}

fn default_graph_base_url() -> String {
    "https://graph.facebook.com".to_string()
}

const fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            verify_token: None,
            app_secret: None,
            api_version: default_api_version(),
            media_api_version: default_media_api_version(),
            graph_base_url: default_graph_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl WhatsAppConfig {
    /// Get the access token as a string reference (for API calls)
    #[must_use]
    pub fn access_token_str(&self) -> Option<&str> {
        self.access_token.as_ref().map(ExposeSecret::expose_secret)
    }

    /// Get the verify token as a string reference (for subscription checks)
    #[must_use]
    pub fn verify_token_str(&self) -> Option<&str> {
        self.verify_token.as_ref().map(ExposeSecret::expose_secret)
    }

    /// Get the app secret as a string reference (for signature verification)
    #[must_use]
    pub fn app_secret_str(&self) -> Option<&str> {
        self.app_secret.as_ref().map(ExposeSecret::expose_secret)
    }

    /// Client settings for the Graph API, if an access token is configured
    #[must_use]
    pub fn client_config(&self) -> Option<WhatsAppClientConfig> {
        self.access_token_str().map(|token| WhatsAppClientConfig {
            access_token: token.to_string(),
            api_version: self.api_version.clone(),
            media_api_version: self.media_api_version.clone(),
            graph_base_url: self.graph_base_url.clone(),
            timeout_ms: self.timeout_ms,
        })
    }
}
