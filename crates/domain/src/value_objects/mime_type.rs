//! Mime type value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// A mime type as declared by a provider, e.g. `audio/ogg; codecs=opus`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MimeType(String);

impl MimeType {
    pub const JPEG: &'static str = "image/jpeg";
    pub const PNG: &'static str = "image/png";
    pub const MPEG: &'static str = "audio/mpeg";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    pub fn jpeg() -> Self {
        Self::new(Self::JPEG)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Type and subtype without parameters (`audio/ogg`)
    pub fn essence(&self) -> &str {
        self.0.split(';').next().unwrap_or_default().trim()
    }

    /// Top-level type (`audio`, `image`), used as the WhatsApp message type
    pub fn top_level(&self) -> &str {
        self.essence().split('/').next().unwrap_or_default()
    }

    /// File extension derived from the subtype (`ogg`)
    pub fn extension(&self) -> &str {
        self.essence().rsplit('/').next().unwrap_or_default()
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MimeType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MimeType {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
