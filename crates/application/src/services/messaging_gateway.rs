//! Messaging gateway - reply delivery on top of the messenger port
//!
//! Text replies go out in one call each; chunked replies are paced by a
//! fixed delay. Media replies are uploaded first, then the uploaded media id
//! is recorded against the recipient and the bytes are backed up (both
//! best-effort) before the media message is sent.

use std::{fmt, sync::Arc, time::Duration};

use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{MediaPayload, MediaStorePort, MessengerPort, ReplyTarget, SenderStorePort},
};

/// Service for sending replies
pub struct MessagingGateway {
    messenger: Arc<dyn MessengerPort>,
    sender_store: Arc<dyn SenderStorePort>,
    backup: Option<Arc<dyn MediaStorePort>>,
    reply_delay: Duration,
}

impl fmt::Debug for MessagingGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessagingGateway")
            .field("backup", &self.backup.is_some())
            .field("reply_delay", &self.reply_delay)
            .finish_non_exhaustive()
    }
}

impl MessagingGateway {
    pub fn new(
        messenger: Arc<dyn MessengerPort>,
        sender_store: Arc<dyn SenderStorePort>,
        backup: Option<Arc<dyn MediaStorePort>>,
        reply_delay: Duration,
    ) -> Self {
        Self {
            messenger,
            sender_store,
            backup,
            reply_delay,
        }
    }

    pub async fn mark_read(
        &self,
        phone_number_id: &str,
        message_id: &str,
    ) -> Result<(), ApplicationError> {
        self.messenger.mark_read(phone_number_id, message_id).await
    }

    /// Send a single text reply
    #[instrument(skip(self, text), fields(recipient = %target.recipient, chars = text.chars().count()))]
    pub async fn send_text(&self, target: &ReplyTarget, text: &str) -> Result<(), ApplicationError> {
        self.messenger.send_text(target, text).await?;
        info!("Text reply sent");
        Ok(())
    }

    /// Send several text replies in order, pausing between them
    pub async fn send_texts<I>(&self, target: &ReplyTarget, texts: I) -> Result<(), ApplicationError>
    where
        I: IntoIterator<Item = String> + Send,
        I::IntoIter: Send,
    {
        for (index, text) in texts.into_iter().enumerate() {
            if index > 0 && !self.reply_delay.is_zero() {
                tokio::time::sleep(self.reply_delay).await;
            }
            self.send_text(target, &text).await?;
        }
        Ok(())
    }

    /// Upload media and send it as a reply
    #[instrument(skip(self, media), fields(recipient = %target.recipient, mime_type = %media.mime_type))]
    pub async fn send_media(
        &self,
        target: &ReplyTarget,
        media: MediaPayload,
    ) -> Result<(), ApplicationError> {
        let mime_type = media.mime_type.clone();
        let backup_copy = self.backup.as_ref().map(|_| media.bytes.clone());

        let media_id = self
            .messenger
            .upload_media(&target.phone_number_id, media)
            .await?;
        debug!(media_id = %media_id, "Media uploaded");

        if let Err(e) = self
            .sender_store
            .record_media_sender(&media_id, &target.recipient)
            .await
        {
            warn!(error = %e, media_id = %media_id, "Failed to record media sender");
        }

        if let (Some(store), Some(bytes)) = (&self.backup, backup_copy) {
            let key = format!("{media_id}.{}", mime_type.extension());
            if let Err(e) = store.put(&key, bytes, &mime_type).await {
                warn!(error = %e, key = %key, "Media backup failed");
            }
        }

        self.messenger
            .send_media(target, &media_id, &mime_type)
            .await?;
        info!(media_id = %media_id, "Media reply sent");
        Ok(())
    }
}
