//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod ascii_art_port;
mod image_tools_port;
mod media_store_port;
mod messenger_port;
mod sender_store_port;
mod speech_port;
mod vision_port;

#[cfg(test)]
pub use ascii_art_port::MockAsciiArtPort;
pub use ascii_art_port::{AsciiArtPort, AsciiArtRequest};
#[cfg(test)]
pub use image_tools_port::MockImageToolsPort;
pub use image_tools_port::ImageToolsPort;
#[cfg(test)]
pub use media_store_port::MockMediaStorePort;
pub use media_store_port::MediaStorePort;
#[cfg(test)]
pub use messenger_port::MockMessengerPort;
pub use messenger_port::{MediaPayload, MessengerPort, ReplyTarget};
#[cfg(test)]
pub use sender_store_port::MockSenderStorePort;
pub use sender_store_port::SenderStorePort;
#[cfg(test)]
pub use speech_port::{MockSynthesisPort, MockTranscriptionPort};
pub use speech_port::{SynthesisPort, TranscriptionPort};
#[cfg(test)]
pub use vision_port::MockVisionPort;
pub use vision_port::VisionPort;
