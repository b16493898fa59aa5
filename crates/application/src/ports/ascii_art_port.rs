//! ASCII-art port - the internal image-to-ASCII rendering service

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;

use crate::error::ApplicationError;

/// Rendering request; the source image is staged as `{media_id}.jpeg`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AsciiArtRequest {
    pub media_id: String,
    pub width: u32,
    pub height: u32,
    pub background_color_name: String,
}

/// Port for the ASCII-art conversion service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AsciiArtPort: Send + Sync {
    /// Render the staged image; returns the storage key of the rendered PNG
    async fn render(&self, request: &AsciiArtRequest) -> Result<String, ApplicationError>;
}
