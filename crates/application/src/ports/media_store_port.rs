//! Media store port - S3-compatible object storage

use async_trait::async_trait;
use domain::MimeType;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for object storage used for backups and ASCII-art staging
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MediaStorePort: Send + Sync {
    /// Store an object
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        mime_type: &MimeType,
    ) -> Result<(), ApplicationError>;

    /// Read an object
    async fn get(&self, key: &str) -> Result<Vec<u8>, ApplicationError>;

    /// Delete an object
    async fn delete(&self, key: &str) -> Result<(), ApplicationError>;
}
