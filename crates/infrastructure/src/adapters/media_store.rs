//! Object storage adapters - implement `MediaStorePort`
//!
//! `S3MediaStore` talks to any S3-compatible service (DigitalOcean Spaces in
//! production) with path-style addressing. `InMemoryMediaStore` keeps objects
//! in process memory for development and tests.

use std::collections::HashMap;

use application::error::ApplicationError;
use application::ports::MediaStorePort;
use async_trait::async_trait;
use domain::MimeType;
use parking_lot::RwLock;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tracing::{debug, instrument};

use crate::config::StorageConfig;

fn storage_error(action: &str, key: &str, e: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::ExternalService(format!("Object storage {action} of `{key}` failed: {e}"))
}

fn check_status(action: &str, key: &str, status: u16, body: &[u8]) -> Result<(), ApplicationError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(storage_error(
            action,
            key,
            format_args!("status {status}: {}", String::from_utf8_lossy(body)),
        ))
    }
}

/// S3-compatible media store
pub struct S3MediaStore {
    bucket: Box<Bucket>,
}

impl std::fmt::Debug for S3MediaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3MediaStore")
            .field("bucket", &self.bucket.name())
            .finish_non_exhaustive()
    }
}

impl S3MediaStore {
    /// Create a store for the configured bucket
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no bucket is set or the credentials
    /// are rejected by the client.
    pub fn new(config: &StorageConfig) -> Result<Self, ApplicationError> {
        let name = config.bucket.as_deref().ok_or_else(|| {
            ApplicationError::Configuration("storage.bucket is required".to_string())
        })?;

        let credentials = Credentials::new(
            config.access_key_str(),
            config.secret_key_str(),
            None,
            None,
            None,
        )
        .map_err(|e| ApplicationError::Configuration(format!("Invalid S3 credentials: {e}")))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let bucket = Bucket::new(name, region, credentials)
            .map_err(|e| ApplicationError::Configuration(format!("Invalid S3 bucket: {e}")))?
            .with_path_style();

        Ok(Self { bucket })
    }
}

#[async_trait]
impl MediaStorePort for S3MediaStore {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        mime_type: &MimeType,
    ) -> Result<(), ApplicationError> {
        let response = self
            .bucket
            .put_object_with_content_type(key, &bytes, mime_type.as_str())
            .await
            .map_err(|e| storage_error("upload", key, e))?;
        check_status("upload", key, response.status_code(), response.as_slice())?;

        debug!("Object stored");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Vec<u8>, ApplicationError> {
        let response = self
            .bucket
            .get_object(key)
            .await
            .map_err(|e| storage_error("download", key, e))?;
        check_status("download", key, response.status_code(), response.as_slice())?;

        debug!(size = response.as_slice().len(), "Object retrieved");
        Ok(response.as_slice().to_vec())
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> Result<(), ApplicationError> {
        let response = self
            .bucket
            .delete_object(key)
            .await
            .map_err(|e| storage_error("delete", key, e))?;
        check_status("delete", key, response.status_code(), response.as_slice())?;

        debug!("Object deleted");
        Ok(())
    }
}

/// Process-local media store
#[derive(Debug, Default)]
pub struct InMemoryMediaStore {
    objects: RwLock<HashMap<String, (Vec<u8>, MimeType)>>,
}

impl InMemoryMediaStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mime type of a stored object
    #[must_use]
    pub fn mime_type(&self, key: &str) -> Option<MimeType> {
        self.objects.read().get(key).map(|(_, mime)| mime.clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

#[async_trait]
impl MediaStorePort for InMemoryMediaStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        mime_type: &MimeType,
    ) -> Result<(), ApplicationError> {
        self.objects
            .write()
            .insert(key.to_string(), (bytes, mime_type.clone()));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, ApplicationError> {
        self.objects
            .read()
            .get(key)
            .map(|(bytes, _)| bytes.clone())
            .ok_or_else(|| storage_error("download", key, "no such key"))
    }

    async fn delete(&self, key: &str) -> Result<(), ApplicationError> {
        self.objects.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[tokio::test]
    async fn in_memory_round_trip() {
        let store = InMemoryMediaStore::new();
        store
            .put("wamid-1.jpeg", vec![1, 2, 3], &MimeType::jpeg())
            .await
            .unwrap();

        assert_eq!(store.get("wamid-1.jpeg").await.unwrap(), vec![1, 2, 3]);
        assert_eq!(store.mime_type("wamid-1.jpeg"), Some(MimeType::jpeg()));

        store.delete("wamid-1.jpeg").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn missing_object_is_external_error() {
        let store = InMemoryMediaStore::new();
        let err = store.get("absent").await.unwrap_err();
        assert!(err.to_string().contains("`absent`"));
        assert!(err.is_system_failure());
    }

    #[test]
    fn s3_store_requires_bucket() {
        let err = S3MediaStore::new(&StorageConfig::default()).unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }

    #[test]
    fn s3_store_builds_with_bucket() {
        let config = StorageConfig {
            bucket: Some("media".into()),
            access_key: Some(SecretString::from("key")),
            secret_key: Some(SecretString::from("secret")),
            ..StorageConfig::default()
        };
        let store = S3MediaStore::new(&config).unwrap();
        assert!(format!("{store:?}").contains("media"));
    }

    #[test]
    fn non_success_status_is_rejected() {
        assert!(check_status("upload", "k", 200, b"").is_ok());
        assert!(check_status("delete", "k", 204, b"").is_ok());
        let err = check_status("download", "k", 404, b"NoSuchKey").unwrap_err();
        assert!(err.to_string().contains("status 404: NoSuchKey"));
    }
}
