//! Domain entities - request-scoped inbound messages and media

mod inbound_message;
mod media;

pub use inbound_message::{InboundChange, InboundMessage, MessageKind};
pub use media::{MediaMetadata, VerifiedMedia};
