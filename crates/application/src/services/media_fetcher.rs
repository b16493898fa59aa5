//! Media fetcher - downloads and verifies media referenced by a message
//!
//! Validation order: mime type against the kind's allow-list, declared size
//! against 25 MiB, then the SHA-256 of the downloaded bytes against the
//! provider hash. Each failure is a [`Rejection`]. A verified download is
//! backed up to object storage when a backup store is configured; backup
//! failures are logged and ignored.

use std::{fmt, sync::Arc};

use domain::{MAX_MEDIA_BYTES, MediaKind, Rejection, VerifiedMedia};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{MediaStorePort, MessengerPort},
};

/// Service for fetching inbound media
pub struct MediaFetcher {
    messenger: Arc<dyn MessengerPort>,
    backup: Option<Arc<dyn MediaStorePort>>,
}

impl fmt::Debug for MediaFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaFetcher")
            .field("backup", &self.backup.is_some())
            .finish_non_exhaustive()
    }
}

impl MediaFetcher {
    /// Create a fetcher; `backup` receives a copy of every verified download
    pub fn new(
        messenger: Arc<dyn MessengerPort>,
        backup: Option<Arc<dyn MediaStorePort>>,
    ) -> Self {
        Self { messenger, backup }
    }

    /// Fetch, validate and verify a media object
    #[instrument(skip(self), fields(kind = %kind))]
    pub async fn fetch(
        &self,
        media_id: &str,
        kind: MediaKind,
    ) -> Result<VerifiedMedia, ApplicationError> {
        let metadata = self.messenger.media_metadata(media_id).await?;
        debug!(
            mime_type = %metadata.mime_type,
            file_size = metadata.file_size,
            "Retrieved media metadata"
        );

        if !kind.accepts(metadata.mime_type.as_str()) {
            return Err(Rejection::UnsupportedMediaFormat {
                kind,
                mime_type: metadata.mime_type.to_string(),
            }
            .into());
        }

        if metadata.file_size > MAX_MEDIA_BYTES {
            return Err(Rejection::MediaTooLarge {
                kind,
                file_size: metadata.file_size,
            }
            .into());
        }

        let bytes = self.messenger.download_media(&metadata.url).await?;
        let computed = sha256_hex(&bytes);
        if !computed.eq_ignore_ascii_case(metadata.sha256.trim()) {
            return Err(Rejection::CorruptedMedia {
                kind,
                computed,
                expected: metadata.sha256,
            }
            .into());
        }

        let media = VerifiedMedia {
            media_id: media_id.to_string(),
            bytes,
            mime_type: metadata.mime_type,
        };
        self.backup(&media).await;

        debug!(size = media.bytes.len(), "Media verified");
        Ok(media)
    }

    async fn backup(&self, media: &VerifiedMedia) {
        let Some(store) = &self.backup else {
            return;
        };
        let key = media.backup_key();
        if let Err(e) = store
            .put(&key, media.bytes.clone(), &media.mime_type)
            .await
        {
            warn!(error = %e, key = %key, "Media backup failed");
        }
    }
}

/// Lower-case hex SHA-256 digest
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
