//! Per-sender state adapters - implement `SenderStorePort`
//!
//! Both stores share one key layout:
//! - `{wa_id}|voice_short_name|lang|gender` → `{short_name}|{locale}|{gender}`
//! - `{media_id}` → `{wa_id}` of the recipient the media was sent to
//!
//! Entries never expire; the last write wins.

use std::collections::HashMap;

use application::error::ApplicationError;
use application::ports::SenderStorePort;
use async_trait::async_trait;
use domain::{PhoneNumber, VoiceSelection};
use parking_lot::RwLock;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::{debug, instrument};

fn voice_key(sender: &PhoneNumber) -> String {
    VoiceSelection::store_key(sender.digits())
}

fn decode_voice(key: &str, value: Option<String>) -> Result<Option<VoiceSelection>, ApplicationError> {
    value
        .map(|value| VoiceSelection::from_store_value(key, &value))
        .transpose()
        .map_err(ApplicationError::from)
}

fn redis_error(e: redis::RedisError) -> ApplicationError {
    ApplicationError::ExternalService(format!("Redis command failed: {e}"))
}

/// Redis-backed sender store
#[derive(Clone)]
pub struct RedisSenderStore {
    connection: ConnectionManager,
}

impl std::fmt::Debug for RedisSenderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSenderStore").finish_non_exhaustive()
    }
}

impl RedisSenderStore {
    /// Connect to Redis
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a malformed URL and an external
    /// service error when the server cannot be reached.
    pub async fn connect(url: &str) -> Result<Self, ApplicationError> {
        let client = redis::Client::open(url)
            .map_err(|e| ApplicationError::Configuration(format!("Invalid Redis URL: {e}")))?;
        let connection = ConnectionManager::new(client).await.map_err(redis_error)?;
        Ok(Self { connection })
    }
}

#[async_trait]
impl SenderStorePort for RedisSenderStore {
    #[instrument(skip(self), fields(sender = %sender))]
    async fn voice_for(
        &self,
        sender: &PhoneNumber,
    ) -> Result<Option<VoiceSelection>, ApplicationError> {
        let key = voice_key(sender);
        let mut connection = self.connection.clone();
        let value: Option<String> = connection.get(&key).await.map_err(redis_error)?;
        decode_voice(&key, value)
    }

    #[instrument(skip(self), fields(sender = %sender, voice = %voice.short_name))]
    async fn save_voice(
        &self,
        sender: &PhoneNumber,
        voice: &VoiceSelection,
    ) -> Result<(), ApplicationError> {
        let mut connection = self.connection.clone();
        let () = connection
            .set(voice_key(sender), voice.to_store_value())
            .await
            .map_err(redis_error)?;
        debug!("Voice saved");
        Ok(())
    }

    #[instrument(skip(self), fields(sender = %sender))]
    async fn record_media_sender(
        &self,
        media_id: &str,
        sender: &PhoneNumber,
    ) -> Result<(), ApplicationError> {
        let mut connection = self.connection.clone();
        let () = connection
            .set(media_id, sender.digits())
            .await
            .map_err(redis_error)?;
        Ok(())
    }
}

/// Process-local sender store
#[derive(Debug, Default)]
pub struct InMemorySenderStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemorySenderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value stored under `key`
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    /// Overwrite a raw value
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.write().insert(key.into(), value.into());
    }
}

#[async_trait]
impl SenderStorePort for InMemorySenderStore {
    async fn voice_for(
        &self,
        sender: &PhoneNumber,
    ) -> Result<Option<VoiceSelection>, ApplicationError> {
        let key = voice_key(sender);
        decode_voice(&key, self.raw(&key))
    }

    async fn save_voice(
        &self,
        sender: &PhoneNumber,
        voice: &VoiceSelection,
    ) -> Result<(), ApplicationError> {
        self.insert_raw(voice_key(sender), voice.to_store_value());
        Ok(())
    }

    async fn record_media_sender(
        &self,
        media_id: &str,
        sender: &PhoneNumber,
    ) -> Result<(), ApplicationError> {
        self.insert_raw(media_id, sender.digits());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> PhoneNumber {
        PhoneNumber::from_wa_id("573001234567").unwrap()
    }

    #[tokio::test]
    async fn unknown_sender_has_no_voice() {
        let store = InMemorySenderStore::new();
        assert!(store.voice_for(&sender()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn saved_voice_is_read_back() {
        let store = InMemorySenderStore::new();
        let voice = VoiceSelection::new("es-MX-DaliaNeural", "es-MX", "Female");
        store.save_voice(&sender(), &voice).await.unwrap();

        assert_eq!(store.voice_for(&sender()).await.unwrap(), Some(voice));
        assert_eq!(
            store
                .raw("573001234567|voice_short_name|lang|gender")
                .as_deref(),
            Some("es-MX-DaliaNeural|es-MX|Female")
        );
    }

    #[tokio::test]
    async fn last_write_wins() {
        let store = InMemorySenderStore::new();
        store
            .save_voice(&sender(), &VoiceSelection::default())
            .await
            .unwrap();
        let second = VoiceSelection::new("en-US-GuyNeural", "en-US", "Male");
        store.save_voice(&sender(), &second).await.unwrap();
        assert_eq!(store.voice_for(&sender()).await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn malformed_stored_voice_is_a_domain_error() {
        let store = InMemorySenderStore::new();
        store.insert_raw("573001234567|voice_short_name|lang|gender", "garbage");
        let err = store.voice_for(&sender()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Domain(_)));
    }

    #[tokio::test]
    async fn media_sender_is_recorded_by_media_id() {
        let store = InMemorySenderStore::new();
        store
            .record_media_sender("1234567890", &sender())
            .await
            .unwrap();
        assert_eq!(store.raw("1234567890").as_deref(), Some("573001234567"));
    }

    #[tokio::test]
    async fn malformed_redis_url_is_configuration_error() {
        let err = RedisSenderStore::connect("not a url").await.unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }
}
