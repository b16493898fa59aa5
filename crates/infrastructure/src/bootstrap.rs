//! Composition root - builds a `Dispatcher` from configuration
//!
//! The Graph API messenger is mandatory. Speech and vision providers with
//! missing credentials are replaced by [`UnconfiguredAdapter`] so the other
//! pipelines keep working. Without a bucket or Redis URL, media and sender
//! state live in process memory.

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{
    AsciiArtPort, MediaStorePort, SenderStorePort, SynthesisPort, TranscriptionPort, VisionPort,
};
use application::{Dispatcher, DispatcherPorts};
use tracing::{info, warn};

use crate::adapters::{
    AsciiArtAdapter, ImageToolsAdapter, InMemoryMediaStore, InMemorySenderStore,
    RedisSenderStore, S3MediaStore, SynthesisAdapter, TranscriptionAdapter, UnconfiguredAdapter,
    VisionAdapter, WhatsAppMessengerAdapter,
};
use crate::config::AppConfig;

fn unconfigured(service: &'static str, err: &ApplicationError) -> UnconfiguredAdapter {
    warn!(service, error = %err, "⚠️ Adapter unavailable, requests needing it will fail");
    UnconfiguredAdapter::new(service, err.to_string())
}

/// Build every adapter and the dispatcher that drives them
///
/// # Errors
///
/// Fails when no Graph API access token is configured, or when a configured
/// bucket or Redis URL cannot be used.
pub async fn build_dispatcher(config: &AppConfig) -> Result<Dispatcher, ApplicationError> {
    let client_config = config.whatsapp.client_config().ok_or_else(|| {
        ApplicationError::Configuration("whatsapp.access_token is required".to_string())
    })?;
    let messenger = WhatsAppMessengerAdapter::new(client_config)
        .map_err(|e| ApplicationError::Configuration(e.to_string()))?;

    let transcription: Arc<dyn TranscriptionPort> =
        match TranscriptionAdapter::openai(config.speech.clone()) {
            Ok(adapter) => Arc::new(adapter),
            Err(e) => Arc::new(unconfigured("OpenAI transcription", &e)),
        };
    let synthesis: Arc<dyn SynthesisPort> = match SynthesisAdapter::azure(config.speech.clone()) {
        Ok(adapter) => Arc::new(adapter),
        Err(e) => Arc::new(unconfigured("Azure Speech", &e)),
    };
    let vision: Arc<dyn VisionPort> = match VisionAdapter::azure(&config.vision) {
        Ok(adapter) => Arc::new(adapter),
        Err(e) => Arc::new(unconfigured("Azure Vision", &e)),
    };
    let ascii_art: Arc<dyn AsciiArtPort> = match AsciiArtAdapter::hosted(&config.vision) {
        Ok(adapter) => Arc::new(adapter),
        Err(e) => Arc::new(unconfigured("ASCII art", &e)),
    };

    let media_store: Arc<dyn MediaStorePort> = if config.storage.bucket.is_some() {
        info!(endpoint = %config.storage.endpoint, "✅ Using S3 media store");
        Arc::new(S3MediaStore::new(&config.storage)?)
    } else {
        warn!("⚠️ No storage bucket configured, media is kept in memory");
        Arc::new(InMemoryMediaStore::new())
    };

    let sender_store: Arc<dyn SenderStorePort> = match &config.store.redis_url {
        Some(url) => {
            let store = RedisSenderStore::connect(url).await?;
            info!("✅ Connected to Redis sender store");
            Arc::new(store)
        },
        None => {
            warn!("⚠️ No Redis URL configured, sender state is kept in memory");
            Arc::new(InMemorySenderStore::new())
        },
    };

    let backup_media = config.storage.backup_enabled && config.storage.bucket.is_some();
    let ports = DispatcherPorts {
        messenger: Arc::new(messenger),
        transcription,
        synthesis,
        vision,
        image_tools: Arc::new(ImageToolsAdapter),
        ascii_art,
        media_store,
        sender_store,
    };

    Ok(Dispatcher::new(
        ports,
        config.dispatcher.to_dispatcher_config(backup_media),
    ))
}
