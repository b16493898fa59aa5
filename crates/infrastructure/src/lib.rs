//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the Graph API
//! messenger, speech and vision providers, object storage and the per-sender
//! key-value store. Also owns configuration loading, log setup and the
//! composition of a ready-to-use dispatcher.

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use bootstrap::build_dispatcher;
pub use config::{
    AppConfig, DispatcherAppConfig, ServerConfig, StorageConfig, StoreConfig, TelemetryAppConfig,
    WhatsAppConfig,
};
pub use telemetry::{TelemetryError, init_telemetry};
