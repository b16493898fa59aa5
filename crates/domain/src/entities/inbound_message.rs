//! Inbound WhatsApp messages grouped by the business number that received them

use serde::{Deserialize, Serialize};

use crate::value_objects::{MimeType, PhoneNumber};

/// One qualifying webhook change: messages addressed to a business number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundChange {
    /// Business phone number id the replies are sent from
    pub phone_number_id: String,
    /// Messages in declaration order
    pub messages: Vec<InboundMessage>,
}

/// A single inbound message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Provider message id (`wamid...`)
    pub id: String,
    /// Sender, normalised to E.164
    pub sender: PhoneNumber,
    pub kind: MessageKind,
}

/// Message payload, tagged by the provider's `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageKind {
    Audio {
        media_id: String,
        mime_type: Option<MimeType>,
    },
    Text {
        body: String,
    },
    Image {
        media_id: String,
        caption: Option<String>,
        mime_type: Option<MimeType>,
    },
    /// Any other type, carrying the raw type name
    Unsupported { message_type: String },
}

impl MessageKind {
    /// Provider type name
    pub fn type_name(&self) -> &str {
        match self {
            Self::Audio { .. } => "audio",
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::Unsupported { message_type } => message_type,
        }
    }
}

impl InboundMessage {
    pub fn new(id: impl Into<String>, sender: PhoneNumber, kind: MessageKind) -> Self {
        Self {
            id: id.into(),
            sender,
            kind,
        }
    }
}
