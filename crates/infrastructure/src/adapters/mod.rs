//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod media_store;
mod sender_store;
mod speech_adapter;
mod unconfigured;
mod vision_adapter;
mod whatsapp_adapter;

pub use media_store::{InMemoryMediaStore, S3MediaStore};
pub use sender_store::{InMemorySenderStore, RedisSenderStore};
pub use speech_adapter::{SynthesisAdapter, TranscriptionAdapter};
pub use unconfigured::UnconfiguredAdapter;
pub use vision_adapter::{AsciiArtAdapter, ImageToolsAdapter, VisionAdapter};
pub use whatsapp_adapter::WhatsAppMessengerAdapter;
