//! Vision adapters - image analysis, ASCII art and local image tools using ai_vision

use std::sync::Arc;

use ai_vision::{
    AsciiArtClient, AsciiArtJob, AsciiArtRenderer, AzureVisionProvider, ImageAnalyzer,
    VisionConfig, VisionError, image_ops,
};
use application::error::ApplicationError;
use application::ports::{AsciiArtPort, AsciiArtRequest, ImageToolsPort, MediaPayload, VisionPort};
use async_trait::async_trait;
use domain::{BackgroundColor, Dimensions, MimeType};
use tracing::{debug, instrument};

fn map_error(err: VisionError) -> ApplicationError {
    match err {
        VisionError::Configuration(e) => ApplicationError::Configuration(e),
        VisionError::Image(e) => ApplicationError::Internal(format!("Image processing failed: {e}")),
        other => ApplicationError::ExternalService(other.to_string()),
    }
}

/// Adapter for captioning, OCR and background removal
pub struct VisionAdapter {
    analyzer: Arc<dyn ImageAnalyzer>,
}

impl std::fmt::Debug for VisionAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionAdapter").finish_non_exhaustive()
    }
}

impl VisionAdapter {
    /// Create an adapter backed by Azure AI Vision
    ///
    /// # Errors
    ///
    /// Returns an error if endpoint or key are missing.
    pub fn azure(config: &VisionConfig) -> Result<Self, ApplicationError> {
        let provider = AzureVisionProvider::new(config).map_err(map_error)?;
        Ok(Self::new(Arc::new(provider)))
    }

    #[must_use]
    pub fn new(analyzer: Arc<dyn ImageAnalyzer>) -> Self {
        Self { analyzer }
    }
}

#[async_trait]
impl VisionPort for VisionAdapter {
    #[instrument(skip(self, image), fields(mime_type = %mime_type, size = image.len()))]
    async fn analyze(
        &self,
        image: Vec<u8>,
        mime_type: &MimeType,
    ) -> Result<String, ApplicationError> {
        let analysis = self
            .analyzer
            .analyze(image, mime_type.as_str())
            .await
            .map_err(map_error)?;

        debug!(
            has_caption = analysis.caption.is_some(),
            read_len = analysis.read_text.len(),
            "Image analyzed"
        );
        Ok(analysis.text().to_string())
    }

    #[instrument(skip(self, image), fields(mime_type = %mime_type, size = image.len()))]
    async fn remove_background(
        &self,
        image: Vec<u8>,
        mime_type: &MimeType,
    ) -> Result<MediaPayload, ApplicationError> {
        let segmented = self
            .analyzer
            .remove_background(image, mime_type.as_str())
            .await
            .map_err(map_error)?;

        Ok(MediaPayload::new(
            segmented.data,
            segmented.mime_type.as_str(),
        ))
    }
}

/// Adapter for the ASCII-art conversion service
pub struct AsciiArtAdapter {
    renderer: Arc<dyn AsciiArtRenderer>,
}

impl std::fmt::Debug for AsciiArtAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsciiArtAdapter").finish_non_exhaustive()
    }
}

impl AsciiArtAdapter {
    /// Create an adapter for the hosted conversion function
    ///
    /// # Errors
    ///
    /// Returns an error if the functions endpoint or namespace are missing.
    pub fn hosted(config: &VisionConfig) -> Result<Self, ApplicationError> {
        let client = AsciiArtClient::new(config).map_err(map_error)?;
        Ok(Self::new(Arc::new(client)))
    }

    #[must_use]
    pub fn new(renderer: Arc<dyn AsciiArtRenderer>) -> Self {
        Self { renderer }
    }
}

#[async_trait]
impl AsciiArtPort for AsciiArtAdapter {
    async fn render(&self, request: &AsciiArtRequest) -> Result<String, ApplicationError> {
        let job = AsciiArtJob {
            media_id: request.media_id.clone(),
            width: request.width,
            height: request.height,
            background_color_name: request.background_color_name.clone(),
        };
        self.renderer.render(&job).await.map_err(map_error)
    }
}

/// Local image decoding, resizing and flattening
///
/// Decoding and encoding run on the blocking thread pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageToolsAdapter;

impl ImageToolsAdapter {
    async fn run_blocking<T, F>(op: F) -> Result<T, ApplicationError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, VisionError> + Send + 'static,
    {
        tokio::task::spawn_blocking(op)
            .await
            .map_err(|e| ApplicationError::Internal(format!("Image task join error: {e}")))?
            .map_err(map_error)
    }
}

#[async_trait]
impl ImageToolsPort for ImageToolsAdapter {
    async fn dimensions(&self, image: &[u8]) -> Result<Dimensions, ApplicationError> {
        let (width, height) = image_ops::dimensions(image).map_err(map_error)?;
        Ok(Dimensions::new(width, height))
    }

    #[instrument(skip(self, image), fields(size = image.len(), width = target.width, height = target.height))]
    async fn resize_to_jpeg(
        &self,
        image: Vec<u8>,
        target: Dimensions,
    ) -> Result<Vec<u8>, ApplicationError> {
        Self::run_blocking(move || image_ops::resize_to_jpeg(&image, target.width, target.height))
            .await
    }

    #[instrument(skip(self, image), fields(size = image.len(), background = background.name()))]
    async fn flatten_to_jpeg(
        &self,
        image: Vec<u8>,
        background: BackgroundColor,
    ) -> Result<Vec<u8>, ApplicationError> {
        let rgb = background.rgb();
        Self::run_blocking(move || image_ops::flatten_to_jpeg(&image, rgb)).await
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use ai_vision::{ImageAnalysis, SegmentedImage};
    use image::{ImageFormat, Rgba, RgbaImage};

    use super::*;

    struct StubAnalyzer;

    #[async_trait]
    impl ImageAnalyzer for StubAnalyzer {
        async fn analyze(
            &self,
            _image: Vec<u8>,
            mime_type: &str,
        ) -> Result<ImageAnalysis, VisionError> {
            assert_eq!(mime_type, "image/jpeg");
            Ok(ImageAnalysis {
                caption: Some("a cat on a sofa".into()),
                read_text: String::new(),
            })
        }

        async fn remove_background(
            &self,
            _image: Vec<u8>,
            _mime_type: &str,
        ) -> Result<SegmentedImage, VisionError> {
            Err(VisionError::RequestFailed("HTTP 500".into()))
        }
    }

    struct RecordingRenderer;

    #[async_trait]
    impl AsciiArtRenderer for RecordingRenderer {
        async fn render(&self, job: &AsciiArtJob) -> Result<String, VisionError> {
            Ok(format!(
                "{}:{}x{}:{}",
                job.media_id, job.width, job.height, job.background_color_name
            ))
        }
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[tokio::test]
    async fn analysis_falls_back_to_caption() {
        let adapter = VisionAdapter::new(Arc::new(StubAnalyzer));
        let text = adapter
            .analyze(vec![1, 2, 3], &MimeType::jpeg())
            .await
            .unwrap();
        assert_eq!(text, "a cat on a sofa");
    }

    #[tokio::test]
    async fn segmentation_failure_is_external() {
        let adapter = VisionAdapter::new(Arc::new(StubAnalyzer));
        let err = adapter
            .remove_background(vec![1], &MimeType::new("image/png"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ExternalService(ref m) if m.contains("HTTP 500")));
    }

    #[tokio::test]
    async fn ascii_request_is_forwarded_unchanged() {
        let adapter = AsciiArtAdapter::new(Arc::new(RecordingRenderer));
        let art = adapter
            .render(&AsciiArtRequest {
                media_id: "wamid-1-bgrm".into(),
                width: 64,
                height: 32,
                background_color_name: "black".into(),
            })
            .await
            .unwrap();
        assert_eq!(art, "wamid-1-bgrm:64x32:black");
    }

    #[tokio::test]
    async fn image_tools_measure_and_resize() {
        let tools = ImageToolsAdapter;
        let source = png(40, 20);
        assert_eq!(tools.dimensions(&source).await.unwrap(), Dimensions::new(40, 20));

        let resized = tools
            .resize_to_jpeg(source, Dimensions::new(8, 8))
            .await
            .unwrap();
        assert_eq!(tools.dimensions(&resized).await.unwrap(), Dimensions::new(8, 8));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn resizing_leaves_the_runtime_thread_free() {
        let tools = ImageToolsAdapter;
        let resize = tokio::spawn(async move {
            tools
                .resize_to_jpeg(png(512, 512), Dimensions::new(1024, 1024))
                .await
        });

        tokio::task::yield_now().await;
        assert!(!resize.is_finished());

        let resized = resize.await.unwrap().unwrap();
        assert_eq!(tools.dimensions(&resized).await.unwrap(), Dimensions::new(1024, 1024));
    }

    #[tokio::test]
    async fn oversized_target_is_internal_error() {
        let err = ImageToolsAdapter
            .resize_to_jpeg(png(4, 4), Dimensions::new(60_000, 60_000))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Internal(ref m) if m.contains("60000x60000")));
    }

    #[tokio::test]
    async fn flatten_produces_jpeg() {
        let tools = ImageToolsAdapter;
        let flattened = tools
            .flatten_to_jpeg(png(4, 4), BackgroundColor::from_name("white"))
            .await
            .unwrap();
        assert_eq!(
            image::guess_format(&flattened).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[tokio::test]
    async fn undecodable_image_is_internal_error() {
        let err = ImageToolsAdapter.dimensions(b"not an image").await.unwrap_err();
        assert!(matches!(err, ApplicationError::Internal(_)));
    }

    #[test]
    fn missing_vision_settings_are_configuration_errors() {
        let config = VisionConfig::default();
        assert!(matches!(
            VisionAdapter::azure(&config).unwrap_err(),
            ApplicationError::Configuration(_)
        ));
        assert!(matches!(
            AsciiArtAdapter::hosted(&config).unwrap_err(),
            ApplicationError::Configuration(_)
        ));
    }
}
