//! WhatsApp webhook payloads
//!
//! Deserialises the Cloud API notification body and reduces it to the
//! domain's [`InboundChange`] list. Every level is optional: payloads the
//! bridge does not handle (status updates, other fields) simply produce no
//! changes.

use domain::{InboundChange, InboundMessage, MessageKind, MimeType, PhoneNumber};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

/// Change field carrying user messages
const MESSAGES_FIELD: &str = "messages";

/// WhatsApp webhook body
#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub changes: Vec<WebhookChange>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookChange {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub value: Option<WebhookValue>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookValue {
    #[serde(default)]
    pub messaging_product: Option<String>,
    #[serde(default)]
    pub metadata: Option<WebhookMetadata>,
    #[serde(default)]
    pub messages: Vec<WebhookMessage>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookMetadata {
    #[serde(default)]
    pub display_phone_number: Option<String>,
    pub phone_number_id: String,
}

#[derive(Debug, Deserialize)]
pub struct WebhookMessage {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(rename = "type", default)]
    pub msg_type: String,
    #[serde(default)]
    pub text: Option<TextMessage>,
    #[serde(default)]
    pub audio: Option<MediaReference>,
    #[serde(default)]
    pub image: Option<MediaReference>,
}

#[derive(Debug, Deserialize)]
pub struct TextMessage {
    pub body: String,
}

/// Media attached to an audio or image message
#[derive(Debug, Deserialize)]
pub struct MediaReference {
    pub id: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

impl WebhookMessage {
    fn kind(&self) -> Option<MessageKind> {
        match self.msg_type.as_str() {
            "audio" => self.audio.as_ref().map(|audio| MessageKind::Audio {
                media_id: audio.id.clone(),
                mime_type: audio.mime_type.as_deref().map(MimeType::from),
            }),
            "text" => self.text.as_ref().map(|text| MessageKind::Text {
                body: text.body.clone(),
            }),
            "image" => self.image.as_ref().map(|image| MessageKind::Image {
                media_id: image.id.clone(),
                caption: image.caption.clone(),
                mime_type: image.mime_type.as_deref().map(MimeType::from),
            }),
            other => Some(MessageKind::Unsupported {
                message_type: other.to_string(),
            }),
        }
    }

    fn to_domain(&self) -> Option<InboundMessage> {
        if self.id.is_empty() {
            warn!(msg_type = %self.msg_type, "Skipping message without id");
            return None;
        }
        let sender = match PhoneNumber::from_wa_id(&self.from) {
            Ok(sender) => sender,
            Err(e) => {
                warn!(message_id = %self.id, error = %e, "Skipping message with invalid sender");
                return None;
            }
        };
        let Some(kind) = self.kind() else {
            warn!(message_id = %self.id, msg_type = %self.msg_type, "Skipping message without payload");
            return None;
        };
        Some(InboundMessage::new(self.id.clone(), sender, kind))
    }
}

/// Verify an `X-Hub-Signature-256` header value against the raw body
pub fn verify_signature(payload: &[u8], signature: &str, secret: &str) -> bool {
    // Signature format: sha256=<hex>
    let Some(signature_hex) = signature.strip_prefix("sha256=") else {
        warn!("Invalid signature format");
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        warn!("Failed to create HMAC");
        return false;
    };

    mac.update(payload);

    let Ok(expected) = hex::decode(signature_hex) else {
        warn!("Failed to decode signature hex");
        return false;
    };

    mac.verify_slice(&expected).is_ok()
}

/// Reduce a webhook payload to the changes the dispatcher handles
///
/// A change qualifies when its field is `messages`, it has metadata and at
/// least one usable message. Order of entries, changes and messages is kept.
pub fn extract_changes(payload: &WebhookPayload) -> Vec<InboundChange> {
    let mut changes = Vec::new();

    for entry in &payload.entry {
        for change in &entry.changes {
            if change.field != MESSAGES_FIELD {
                debug!(field = %change.field, "Ignoring change");
                continue;
            }
            let Some(value) = &change.value else {
                continue;
            };
            let Some(metadata) = &value.metadata else {
                debug!("Ignoring change without metadata");
                continue;
            };

            let messages: Vec<InboundMessage> =
                value.messages.iter().filter_map(WebhookMessage::to_domain).collect();
            if messages.is_empty() {
                continue;
            }

            changes.push(InboundChange {
                phone_number_id: metadata.phone_number_id.clone(),
                messages,
            });
        }
    }

    changes
}
