//! Azure AI Vision provider
//!
//! Image analysis 4.0: `imageanalysis:analyze` for caption + OCR and
//! `imageanalysis:segment` for background removal. Images are posted as raw
//! bytes with their own content type.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::VisionConfig;
use crate::error::VisionError;
use crate::ports::ImageAnalyzer;
use crate::types::{ImageAnalysis, SegmentedImage};

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const ANALYZE_QUERY: &str =
    "features=caption,read&model-version=latest&language=en&api-version=2024-02-01";
const SEGMENT_QUERY: &str = "api-version=2023-02-01-preview&mode=backgroundRemoval";
const DEFAULT_SEGMENT_TYPE: &str = "image/png";

/// Azure AI Vision client
#[derive(Debug, Clone)]
pub struct AzureVisionProvider {
    client: Client,
    endpoint: String,
    key: String,
}

impl AzureVisionProvider {
    /// Create a new Azure Vision provider
    ///
    /// # Errors
    ///
    /// Returns `VisionError::Configuration` if endpoint or key are missing.
    pub fn new(config: &VisionConfig) -> Result<Self, VisionError> {
        config.validate_azure().map_err(VisionError::Configuration)?;
        let endpoint = config
            .azure_endpoint()
            .map_err(VisionError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                VisionError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoint,
            key: config.key.clone().unwrap_or_default(),
        })
    }

    fn analyze_url(&self) -> String {
        format!(
            "{}/computervision/imageanalysis:analyze?{ANALYZE_QUERY}",
            self.endpoint
        )
    }

    fn segment_url(&self) -> String {
        format!(
            "{}/computervision/imageanalysis:segment?{SEGMENT_QUERY}",
            self.endpoint
        )
    }

    async fn post_image(
        &self,
        url: String,
        image: Vec<u8>,
        mime_type: &str,
    ) -> Result<reqwest::Response, VisionError> {
        let response = self
            .client
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .header(CONTENT_TYPE, mime_type)
            .body(image)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Azure Vision request failed");
            return Err(VisionError::RequestFailed(format!("HTTP {status}: {body}")));
        }
        Ok(response)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    #[serde(default)]
    caption_result: Option<CaptionResult>,
    #[serde(default)]
    read_result: Option<ReadResult>,
}

#[derive(Debug, Deserialize)]
struct CaptionResult {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ReadResult {
    #[serde(default)]
    blocks: Vec<ReadBlock>,
}

#[derive(Debug, Deserialize)]
struct ReadBlock {
    #[serde(default)]
    lines: Vec<ReadLine>,
}

#[derive(Debug, Deserialize)]
struct ReadLine {
    text: String,
}

impl From<AnalyzeResponse> for ImageAnalysis {
    fn from(response: AnalyzeResponse) -> Self {
        let read_text = response
            .read_result
            .map(|read| {
                read.blocks
                    .iter()
                    .map(|block| {
                        block
                            .lines
                            .iter()
                            .map(|line| line.text.as_str())
                            .collect::<Vec<_>>()
                            .join("\n")
                    })
                    .collect::<Vec<_>>()
                    .join("\n\n")
            })
            .unwrap_or_default();

        Self {
            caption: response.caption_result.map(|c| c.text),
            read_text,
        }
    }
}

#[async_trait]
impl ImageAnalyzer for AzureVisionProvider {
    #[instrument(skip(self, image), fields(image_size = image.len(), mime_type = %mime_type))]
    async fn analyze(
        &self,
        image: Vec<u8>,
        mime_type: &str,
    ) -> Result<ImageAnalysis, VisionError> {
        let response = self.post_image(self.analyze_url(), image, mime_type).await?;
        let parsed: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| VisionError::InvalidResponse(format!("Failed to parse analysis: {e}")))?;

        let analysis = ImageAnalysis::from(parsed);
        debug!(
            text_len = analysis.read_text.len(),
            has_caption = analysis.caption.is_some(),
            "Image analysed"
        );
        Ok(analysis)
    }

    #[instrument(skip(self, image), fields(image_size = image.len(), mime_type = %mime_type))]
    async fn remove_background(
        &self,
        image: Vec<u8>,
        mime_type: &str,
    ) -> Result<SegmentedImage, VisionError> {
        let response = self.post_image(self.segment_url(), image, mime_type).await?;

        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_SEGMENT_TYPE)
            .to_string();
        let data = response
            .bytes()
            .await
            .map_err(|e| VisionError::InvalidResponse(format!("Failed to read image: {e}")))?
            .to_vec();

        debug!(image_size = data.len(), mime_type = %mime_type, "Background removed");
        Ok(SegmentedImage { data, mime_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_and_lines_are_joined() {
        let json = r#"{
            "modelVersion": "2023-10-01",
            "captionResult": {"text": "a menu board", "confidence": 0.8},
            "readResult": {"blocks": [
                {"lines": [{"text": "Coffee 2.50"}, {"text": "Tea 2.00"}]},
                {"lines": [{"text": "Open daily"}]}
            ]}
        }"#;
        let analysis = ImageAnalysis::from(serde_json::from_str::<AnalyzeResponse>(json).unwrap());
        assert_eq!(analysis.read_text, "Coffee 2.50\nTea 2.00\n\nOpen daily");
        assert_eq!(analysis.caption.as_deref(), Some("a menu board"));
    }

    #[test]
    fn missing_read_result_yields_caption() {
        let json = r#"{"captionResult": {"text": "a dog", "confidence": 0.9}}"#;
        let analysis = ImageAnalysis::from(serde_json::from_str::<AnalyzeResponse>(json).unwrap());
        assert_eq!(analysis.text(), "a dog");
    }

    #[test]
    fn urls_carry_api_versions() {
        let provider = AzureVisionProvider::new(&VisionConfig {
            endpoint: Some("https://res.cognitiveservices.azure.com/".into()),
            key: Some("k".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            provider.analyze_url(),
            "https://res.cognitiveservices.azure.com/computervision/imageanalysis:analyze?features=caption,read&model-version=latest&language=en&api-version=2024-02-01"
        );
        assert!(provider.segment_url().ends_with(
            "imageanalysis:segment?api-version=2023-02-01-preview&mode=backgroundRemoval"
        ));
    }
}
