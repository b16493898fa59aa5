//! AI Vision - image analysis and transformation
//!
//! - `ImageAnalyzer` - caption/OCR and background removal (Azure AI Vision)
//! - `AsciiArtRenderer` - the internal ASCII-art conversion service
//! - `image_ops` - local decoding, resizing and flattening with the `image` crate
//!
//! # Example
//!
//! ```ignore
//! use ai_vision::{AzureVisionProvider, ImageAnalyzer, VisionConfig};
//!
//! let vision = AzureVisionProvider::new(config)?;
//! let analysis = vision.analyze(bytes, "image/jpeg").await?;
//! println!("{}", analysis.text());
//! ```

pub mod config;
pub mod error;
pub mod image_ops;
pub mod ports;
pub mod providers;
pub mod types;

pub use config::VisionConfig;
pub use error::VisionError;
pub use ports::{AsciiArtRenderer, ImageAnalyzer};
pub use providers::{ascii::AsciiArtClient, azure::AzureVisionProvider};
pub use types::{AsciiArtJob, ImageAnalysis, SegmentedImage};
