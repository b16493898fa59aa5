//! Media metadata and verified media payloads

use serde::{Deserialize, Serialize};

use crate::value_objects::MimeType;

/// Media metadata as reported by the Graph API
///
/// Untrusted until the downloaded bytes hash to `sha256`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub url: String,
    pub sha256: String,
    pub mime_type: MimeType,
    pub file_size: u64,
}

/// Downloaded media whose hash matched the provider's
#[derive(Clone, PartialEq, Eq)]
pub struct VerifiedMedia {
    pub media_id: String,
    pub bytes: Vec<u8>,
    pub mime_type: MimeType,
}

impl VerifiedMedia {
    /// Object storage key for a backup copy (`{media_id}.{extension}`)
    pub fn backup_key(&self) -> String {
        format!("{}.{}", self.media_id, self.mime_type.extension())
    }
}

impl std::fmt::Debug for VerifiedMedia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifiedMedia")
            .field("media_id", &self.media_id)
            .field("bytes", &format_args!("[{} bytes]", self.bytes.len()))
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_key_uses_subtype_extension() {
        let media = VerifiedMedia {
            media_id: "123".into(),
            bytes: vec![1, 2, 3],
            mime_type: MimeType::new("audio/ogg; codecs=opus"),
        };
        assert_eq!(media.backup_key(), "123.ogg");
    }

    #[test]
    fn debug_hides_payload() {
        let media = VerifiedMedia {
            media_id: "123".into(),
            bytes: vec![0; 2048],
            mime_type: MimeType::jpeg(),
        };
        let debug = format!("{media:?}");
        assert!(debug.contains("[2048 bytes]"));
    }
}
