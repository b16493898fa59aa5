//! ASCII-art service client
//!
//! The service is a web action on the same serverless platform. It reads the
//! staged JPEG from object storage, renders it and answers with the storage
//! key of the resulting PNG as plain text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::VisionConfig;
use crate::error::VisionError;
use crate::ports::AsciiArtRenderer;
use crate::types::AsciiArtJob;

/// HTTP client for the ASCII-art action
#[derive(Debug, Clone)]
pub struct AsciiArtClient {
    client: Client,
    url: String,
}

impl AsciiArtClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns `VisionError::Configuration` if endpoint or namespace are missing.
    pub fn new(config: &VisionConfig) -> Result<Self, VisionError> {
        config
            .validate_ascii_art()
            .map_err(VisionError::Configuration)?;
        let url = config.ascii_art_url().map_err(VisionError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                VisionError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl AsciiArtRenderer for AsciiArtClient {
    #[instrument(skip(self), fields(media_id = %job.media_id, width = job.width, height = job.height))]
    async fn render(&self, job: &AsciiArtJob) -> Result<String, VisionError> {
        // The action is exposed as GET and reads its parameters from the JSON body.
        let response = self.client.get(&self.url).json(job).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::RequestFailed(format!("HTTP {status}: {body}")));
        }

        let key = response.text().await?.trim().to_string();
        if key.is_empty() {
            return Err(VisionError::InvalidResponse(
                "ASCII-art service returned no key".to_string(),
            ));
        }

        debug!(key = %key, "ASCII art rendered");
        Ok(key)
    }
}
