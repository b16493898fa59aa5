//! Value Objects - Immutable, identity-less domain primitives

mod background_color;
mod dimensions;
mod media_kind;
mod mime_type;
mod phone_number;
mod voice_selection;

pub use background_color::BackgroundColor;
pub use dimensions::{DEFAULT_SHORT_SIDE, Dimensions, MAX_ASCII_SIDE};
pub use media_kind::{MAX_MEDIA_BYTES, MediaKind};
pub use mime_type::MimeType;
pub use phone_number::PhoneNumber;
pub use voice_selection::VoiceSelection;
