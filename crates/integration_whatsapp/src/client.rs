//! WhatsApp client for the Meta Graph API
//!
//! Read receipts, text and media replies, media upload, media metadata and
//! media download. Every call fails on a non-success status; nothing is
//! retried.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, instrument};

/// WhatsApp API errors
#[derive(Debug, Error)]
pub enum WhatsAppError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: HTTP {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Missing configuration: {0}")]
    Configuration(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// WhatsApp client configuration
#[derive(Debug, Clone)]
pub struct WhatsAppClientConfig {
    /// Meta Graph API access token
    pub access_token: String,
    /// API version for messages and media metadata
    pub api_version: String,
    /// API version for media upload
    pub media_api_version: String,
    /// Graph API base URL
    pub graph_base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for WhatsAppClientConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            api_version: "v19.0".to_string(),
            media_api_version: "v21.0".to_string(),
            graph_base_url: "https://graph.facebook.com".to_string(),
            timeout_ms: 30000,
        }
    }
}

/// Media metadata as returned by the Graph API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MediaInfo {
    pub url: String,
    pub mime_type: String,
    pub sha256: String,
    pub file_size: u64,
    #[serde(default)]
    pub id: Option<String>,
}

/// WhatsApp client for the Meta Graph API
#[derive(Debug, Clone)]
pub struct WhatsAppClient {
    client: Client,
    config: WhatsAppClientConfig,
}

#[derive(Debug, Serialize)]
struct ReadReceipt<'a> {
    messaging_product: &'static str,
    status: &'static str,
    message_id: &'a str,
}

#[derive(Debug, Serialize)]
struct SendTextRequest<'a> {
    messaging_product: &'static str,
    recipient_type: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    msg_type: &'static str,
    text: TextContent<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<ReplyContext<'a>>,
}

#[derive(Debug, Serialize)]
struct TextContent<'a> {
    preview_url: bool,
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct ReplyContext<'a> {
    message_id: &'a str,
}

/// API response for sent message
#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    #[serde(default)]
    messages: Vec<MessageInfo>,
}

#[derive(Debug, Deserialize)]
struct MessageInfo {
    id: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: String,
}

/// API error response
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl WhatsAppClient {
    /// Create a new WhatsApp client
    pub fn new(config: WhatsAppClientConfig) -> Result<Self, WhatsAppError> {
        if config.access_token.is_empty() {
            return Err(WhatsAppError::Configuration(
                "access_token is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| WhatsAppError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn base_url(&self) -> &str {
        self.config.graph_base_url.trim_end_matches('/')
    }

    fn messages_url(&self, phone_number_id: &str) -> String {
        format!(
            "{}/{}/{phone_number_id}/messages",
            self.base_url(),
            self.config.api_version
        )
    }

    fn media_upload_url(&self, phone_number_id: &str) -> String {
        format!(
            "{}/{}/{phone_number_id}/media",
            self.base_url(),
            self.config.media_api_version
        )
    }

    fn media_url(&self, media_id: &str) -> String {
        format!("{}/{}/{media_id}/", self.base_url(), self.config.api_version)
    }

    async fn check(response: Response) -> Result<Response, WhatsAppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorResponse>(&body)
            .map_or(body, |error| error.error.message);
        Err(WhatsAppError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn post_message(
        &self,
        phone_number_id: &str,
        body: &impl Serialize,
    ) -> Result<String, WhatsAppError> {
        let response = self
            .client
            .post(self.messages_url(phone_number_id))
            .bearer_auth(&self.config.access_token)
            .json(body)
            .send()
            .await?;
        let sent: SendMessageResponse = Self::check(response).await?.json().await?;
        Ok(sent
            .messages
            .into_iter()
            .next()
            .map(|m| m.id)
            .unwrap_or_default())
    }

    /// Mark an inbound message as read
    #[instrument(skip(self))]
    pub async fn mark_read(
        &self,
        phone_number_id: &str,
        message_id: &str,
    ) -> Result<(), WhatsAppError> {
        let receipt = ReadReceipt {
            messaging_product: "whatsapp",
            status: "read",
            message_id,
        };
        let response = self
            .client
            .post(self.messages_url(phone_number_id))
            .bearer_auth(&self.config.access_token)
            .json(&receipt)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Send a text message; `to` is the recipient's digits without `+`
    ///
    /// Returns the id of the sent message.
    #[instrument(skip(self, body), fields(body_len = body.len()))]
    pub async fn send_text(
        &self,
        phone_number_id: &str,
        to: &str,
        body: &str,
        reply_to: Option<&str>,
    ) -> Result<String, WhatsAppError> {
        let request = SendTextRequest {
            messaging_product: "whatsapp",
            recipient_type: "individual",
            to,
            msg_type: "text",
            text: TextContent {
                preview_url: false,
                body,
            },
            context: reply_to.map(|message_id| ReplyContext { message_id }),
        };
        let id = self.post_message(phone_number_id, &request).await?;
        debug!(message_id = %id, "Text message sent");
        Ok(id)
    }

    /// Send previously uploaded media
    ///
    /// `media_type` is the top-level mime type (`audio`, `image`, ...) and is
    /// used both as the message type and as the payload key.
    #[instrument(skip(self))]
    pub async fn send_media(
        &self,
        phone_number_id: &str,
        to: &str,
        media_id: &str,
        media_type: &str,
        reply_to: Option<&str>,
    ) -> Result<String, WhatsAppError> {
        let mut request = json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": to,
            "type": media_type,
        });
        request[media_type] = json!({ "id": media_id });
        if let Some(message_id) = reply_to {
            request["context"] = json!({ "message_id": message_id });
        }
        let id = self.post_message(phone_number_id, &request).await?;
        debug!(message_id = %id, "Media message sent");
        Ok(id)
    }

    /// Upload media for later sending; returns the media id
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn upload_media(
        &self,
        phone_number_id: &str,
        data: Vec<u8>,
        mime_type: &str,
        extension: &str,
    ) -> Result<String, WhatsAppError> {
        let file = Part::bytes(data)
            .file_name(format!("file.{extension}"))
            .mime_str(mime_type)
            .map_err(|e| WhatsAppError::Configuration(format!("Invalid MIME type: {e}")))?;
        let form = Form::new()
            .part("file", file)
            .text("type", mime_type.to_string())
            .text("messaging_product", "whatsapp");

        let response = self
            .client
            .post(self.media_upload_url(phone_number_id))
            .bearer_auth(&self.config.access_token)
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadResponse = Self::check(response).await?.json().await?;
        debug!(media_id = %uploaded.id, "Media uploaded");
        Ok(uploaded.id)
    }

    /// Fetch metadata of a media object
    #[instrument(skip(self))]
    pub async fn media_info(&self, media_id: &str) -> Result<MediaInfo, WhatsAppError> {
        let response = self
            .client
            .get(self.media_url(media_id))
            .bearer_auth(&self.config.access_token)
            .send()
            .await?;
        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| WhatsAppError::InvalidResponse(format!("media metadata: {e}")))
    }

    /// Download media bytes from a lookaside URL
    #[instrument(skip(self, url))]
    pub async fn download_media(&self, url: &str) -> Result<Vec<u8>, WhatsAppError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.config.access_token)
            .send()
            .await?;
        let bytes = Self::check(response).await?.bytes().await?;
        debug!(size = bytes.len(), "Media downloaded");
        Ok(bytes.to_vec())
    }
}
