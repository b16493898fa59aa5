//! Sender store port - per-sender state in the key-value store

use async_trait::async_trait;
use domain::{PhoneNumber, VoiceSelection};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for per-sender state. No TTL, last write wins.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SenderStorePort: Send + Sync {
    /// Voice the sender chose with `/voice`, if any
    async fn voice_for(
        &self,
        sender: &PhoneNumber,
    ) -> Result<Option<VoiceSelection>, ApplicationError>;

    /// Remember a sender's voice
    async fn save_voice(
        &self,
        sender: &PhoneNumber,
        voice: &VoiceSelection,
    ) -> Result<(), ApplicationError>;

    /// Record which sender an uploaded media id was sent to
    async fn record_media_sender(
        &self,
        media_id: &str,
        sender: &PhoneNumber,
    ) -> Result<(), ApplicationError>;
}
