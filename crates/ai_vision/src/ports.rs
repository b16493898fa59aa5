//! Port definitions for vision services

use async_trait::async_trait;

use crate::error::VisionError;
use crate::types::{AsciiArtJob, ImageAnalysis, SegmentedImage};

/// Image understanding and background removal
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    /// Caption the image and read any text in it
    async fn analyze(&self, image: Vec<u8>, mime_type: &str)
    -> Result<ImageAnalysis, VisionError>;

    /// Remove the background, returning a transparent image
    async fn remove_background(
        &self,
        image: Vec<u8>,
        mime_type: &str,
    ) -> Result<SegmentedImage, VisionError>;
}

/// ASCII-art conversion of a staged image
#[async_trait]
pub trait AsciiArtRenderer: Send + Sync {
    /// Render the job; returns the storage key of the rendered PNG
    async fn render(&self, job: &AsciiArtJob) -> Result<String, VisionError>;
}
