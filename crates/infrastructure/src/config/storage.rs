//! Object storage and key-value store configuration.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{default_true, messenger::redacted};

/// S3-compatible object storage (DigitalOcean Spaces)
#[derive(Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket name; without one, media is kept in memory only
    #[serde(default)]
    pub bucket: Option<String>,

    /// Region name passed to the signer
    #[serde(default = "default_region")]
    pub region: String,

    /// Endpoint URL of the S3-compatible service
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Access key id (sensitive)
    #[serde(default, skip_serializing)]
    pub access_key: Option<SecretString>,

    /// Secret access key (sensitive)
    #[serde(default, skip_serializing)]
    pub secret_key: Option<SecretString>,

    /// Back up inbound and outbound media (default: true)
    #[serde(default = "default_true")]
    pub backup_enabled: bool,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("access_key", &redacted(self.access_key.as_ref()))
            .field("secret_key", &redacted(self.secret_key.as_ref()))
            .field("backup_enabled", &self.backup_enabled)
            .finish()
    }
}

fn default_region() -> String {
    "nyc3".to_string()
}

fn default_endpoint() -> String {
    "https://nyc3.digitaloceanspaces.com".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            region: default_region(),
            endpoint: default_endpoint(),
            access_key: None,
            secret_key: None,
            backup_enabled: true,
        }
    }
}

impl StorageConfig {
    #[must_use]
    pub fn access_key_str(&self) -> Option<&str> {
        self.access_key.as_ref().map(ExposeSecret::expose_secret)
    }

    #[must_use]
    pub fn secret_key_str(&self) -> Option<&str> {
        self.secret_key.as_ref().map(ExposeSecret::expose_secret)
    }
}

/// Per-sender key-value store
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Redis connection URL; without one, state lives in process memory
    #[serde(default)]
    pub redis_url: Option<String>,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // URLs may embed a password
        f.debug_struct("StoreConfig")
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
