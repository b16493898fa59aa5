//! Image tools port - local decoding, resizing and flattening

use async_trait::async_trait;
use domain::{BackgroundColor, Dimensions};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for CPU-bound image operations
///
/// Implementations must keep decoding and encoding off the async workers.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ImageToolsPort: Send + Sync {
    /// Pixel dimensions of an encoded image, read from its header
    async fn dimensions(&self, image: &[u8]) -> Result<Dimensions, ApplicationError>;

    /// Resize to exactly `target` and encode as JPEG
    async fn resize_to_jpeg(
        &self,
        image: Vec<u8>,
        target: Dimensions,
    ) -> Result<Vec<u8>, ApplicationError>;

    /// Encode as JPEG, compositing transparent images onto `background`
    ///
    /// Transparent images are cropped to their visible content plus a
    /// 10 px border first.
    async fn flatten_to_jpeg(
        &self,
        image: Vec<u8>,
        background: BackgroundColor,
    ) -> Result<Vec<u8>, ApplicationError>;
}
