//! Domain layer for the WhatsApp AI bridge
//!
//! Contains the inbound message model, media and voice value objects, typed
//! user commands, user-facing rejections and the fixed reply texts.
//! This layer has no I/O and defines the ubiquitous language.

pub mod chunking;
pub mod commands;
pub mod entities;
pub mod errors;
pub mod rejection;
pub mod replies;
pub mod value_objects;

pub use chunking::{MAX_REPLY_CHARS, chunk_text};
pub use commands::{AsciiArtOptions, ImageCommand, TextCommand};
pub use entities::*;
pub use errors::DomainError;
pub use rejection::Rejection;
pub use value_objects::*;
