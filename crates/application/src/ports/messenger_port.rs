//! Messenger port - WhatsApp Cloud API operations the dispatcher needs

#[cfg(test)]
use mockall::automock;

use async_trait::async_trait;
use domain::{InboundMessage, MediaMetadata, MimeType, PhoneNumber};

use crate::error::ApplicationError;

/// Where a reply goes: business number, recipient and the message it answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyTarget {
    /// Business phone number id the reply is sent from
    pub phone_number_id: String,
    /// Recipient in E.164 form
    pub recipient: PhoneNumber,
    /// Message id the reply is threaded to
    pub reply_to: Option<String>,
}

impl ReplyTarget {
    /// Reply threaded to an inbound message
    #[must_use]
    pub fn for_message(phone_number_id: impl Into<String>, message: &InboundMessage) -> Self {
        Self {
            phone_number_id: phone_number_id.into(),
            recipient: message.sender.clone(),
            reply_to: Some(message.id.clone()),
        }
    }
}

/// Binary media with its mime type
#[derive(Clone, PartialEq, Eq)]
pub struct MediaPayload {
    pub bytes: Vec<u8>,
    pub mime_type: MimeType,
}

impl MediaPayload {
    #[must_use]
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<MimeType>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }
}

impl std::fmt::Debug for MediaPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaPayload")
            .field("bytes", &format_args!("[{} bytes]", self.bytes.len()))
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// Port for the messaging provider
///
/// Every call fails on a non-2xx response. No retries.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessengerPort: Send + Sync {
    /// Mark an inbound message as read
    async fn mark_read(&self, phone_number_id: &str, message_id: &str)
    -> Result<(), ApplicationError>;

    /// Send a text reply (link previews disabled)
    async fn send_text(&self, target: &ReplyTarget, text: &str) -> Result<(), ApplicationError>;

    /// Upload media and return the provider media id
    async fn upload_media(
        &self,
        phone_number_id: &str,
        media: MediaPayload,
    ) -> Result<String, ApplicationError>;

    /// Send previously uploaded media
    ///
    /// The message type is the mime type's top-level part.
    async fn send_media(
        &self,
        target: &ReplyTarget,
        media_id: &str,
        mime_type: &MimeType,
    ) -> Result<(), ApplicationError>;

    /// Fetch metadata (download URL, hash, mime type, size) for a media id
    async fn media_metadata(&self, media_id: &str) -> Result<MediaMetadata, ApplicationError>;

    /// Download media bytes from a metadata URL
    async fn download_media(&self, url: &str) -> Result<Vec<u8>, ApplicationError>;
}
