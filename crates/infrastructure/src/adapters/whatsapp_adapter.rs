//! WhatsApp messenger adapter
//!
//! Implements the `MessengerPort` trait using the WhatsApp integration crate.

use application::error::ApplicationError;
use application::ports::{MediaPayload, MessengerPort, ReplyTarget};
use async_trait::async_trait;
use domain::{MediaMetadata, MimeType};
use integration_whatsapp::{WhatsAppClient, WhatsAppClientConfig, WhatsAppError};
use tracing::{debug, instrument};

/// Adapter that implements `MessengerPort` using `WhatsAppClient`
pub struct WhatsAppMessengerAdapter {
    client: WhatsAppClient,
}

impl WhatsAppMessengerAdapter {
    /// Create a new WhatsApp messenger adapter
    ///
    /// # Errors
    /// Returns an error if the client configuration is invalid.
    pub fn new(config: WhatsAppClientConfig) -> Result<Self, WhatsAppError> {
        Ok(Self {
            client: WhatsAppClient::new(config)?,
        })
    }

    /// Get a reference to the underlying client
    #[must_use]
    pub const fn client(&self) -> &WhatsAppClient {
        &self.client
    }
}

impl std::fmt::Debug for WhatsAppMessengerAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppMessengerAdapter")
            .finish_non_exhaustive()
    }
}

fn external(action: &str) -> impl FnOnce(WhatsAppError) -> ApplicationError + '_ {
    move |e| ApplicationError::ExternalService(format!("WhatsApp {action} failed: {e}"))
}

#[async_trait]
impl MessengerPort for WhatsAppMessengerAdapter {
    #[instrument(skip(self))]
    async fn mark_read(
        &self,
        phone_number_id: &str,
        message_id: &str,
    ) -> Result<(), ApplicationError> {
        self.client
            .mark_read(phone_number_id, message_id)
            .await
            .map_err(external("mark read"))
    }

    #[instrument(skip(self, text), fields(recipient = %target.recipient))]
    async fn send_text(&self, target: &ReplyTarget, text: &str) -> Result<(), ApplicationError> {
        let message_id = self
            .client
            .send_text(
                &target.phone_number_id,
                target.recipient.digits(),
                text,
                target.reply_to.as_deref(),
            )
            .await
            .map_err(external("send"))?;

        debug!(message_id = %message_id, "WhatsApp text message sent");
        Ok(())
    }

    #[instrument(skip(self, media), fields(mime_type = %media.mime_type, size = media.bytes.len()))]
    async fn upload_media(
        &self,
        phone_number_id: &str,
        media: MediaPayload,
    ) -> Result<String, ApplicationError> {
        let extension = media.mime_type.extension().to_string();
        self.client
            .upload_media(
                phone_number_id,
                media.bytes,
                media.mime_type.as_str(),
                &extension,
            )
            .await
            .map_err(external("upload"))
    }

    #[instrument(skip(self), fields(recipient = %target.recipient))]
    async fn send_media(
        &self,
        target: &ReplyTarget,
        media_id: &str,
        mime_type: &MimeType,
    ) -> Result<(), ApplicationError> {
        let message_id = self
            .client
            .send_media(
                &target.phone_number_id,
                target.recipient.digits(),
                media_id,
                mime_type.top_level(),
                target.reply_to.as_deref(),
            )
            .await
            .map_err(external("media send"))?;

        debug!(message_id = %message_id, "WhatsApp media message sent");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn media_metadata(&self, media_id: &str) -> Result<MediaMetadata, ApplicationError> {
        let info = self
            .client
            .media_info(media_id)
            .await
            .map_err(external("media lookup"))?;

        Ok(MediaMetadata {
            url: info.url,
            sha256: info.sha256,
            mime_type: MimeType::new(info.mime_type),
            file_size: info.file_size,
        })
    }

    #[instrument(skip(self, url))]
    async fn download_media(&self, url: &str) -> Result<Vec<u8>, ApplicationError> {
        self.client
            .download_media(url)
            .await
            .map_err(external("download"))
    }
}
