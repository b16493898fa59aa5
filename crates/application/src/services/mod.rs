//! Application services - Use case implementations

mod dispatcher;
mod media_fetcher;
mod messaging_gateway;

pub use dispatcher::{DispatchSummary, Dispatcher, DispatcherConfig, DispatcherPorts};
pub use media_fetcher::{MediaFetcher, sha256_hex};
pub use messaging_gateway::MessagingGateway;
