//! Vision port - image captioning, OCR and background removal

use async_trait::async_trait;
use domain::MimeType;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;
use crate::ports::MediaPayload;

/// Port for the image analysis provider
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VisionPort: Send + Sync {
    /// Read text from an image, falling back to a caption when none is found
    async fn analyze(&self, image: Vec<u8>, mime_type: &MimeType)
    -> Result<String, ApplicationError>;

    /// Remove the background, returning a transparent image
    async fn remove_background(
        &self,
        image: Vec<u8>,
        mime_type: &MimeType,
    ) -> Result<MediaPayload, ApplicationError>;
}
