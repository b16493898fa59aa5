//! Media kinds accepted from senders and their format allow-lists

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound on inbound media size (25 MiB)
pub const MAX_MEDIA_BYTES: u64 = 25 * 1024 * 1024;

const AUDIO_FORMATS: &[&str] = &[
    "flac", "mp3", "mp4", "mpeg", "mpga", "m4a", "ogg", "wav", "webm",
];

const IMAGE_FORMATS: &[&str] = &["jpeg", "png"];

/// Kind of inbound media a message references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Image,
}

impl MediaKind {
    /// Format tokens accepted for this kind
    #[must_use]
    pub const fn allowed_formats(self) -> &'static [&'static str] {
        match self {
            Self::Audio => AUDIO_FORMATS,
            Self::Image => IMAGE_FORMATS,
        }
    }

    /// Whether the provider-declared mime type is acceptable
    ///
    /// Substring match, since WhatsApp sends values like
    /// `audio/ogg; codecs=opus`.
    #[must_use]
    pub fn accepts(self, mime_type: &str) -> bool {
        let mime_type = mime_type.to_ascii_lowercase();
        self.allowed_formats()
            .iter()
            .any(|format| mime_type.contains(format))
    }

    /// Allowed formats as a Spanish enumeration ("a, b y c")
    #[must_use]
    pub fn allowed_formats_sentence(self) -> String {
        match self.allowed_formats() {
            [] => String::new(),
            [only] => (*only).to_string(),
            [init @ .., last] => format!("{} y {last}", init.join(", ")),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Audio => write!(f, "audio"),
            Self::Image => write!(f, "image"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opus_voice_notes_are_accepted() {
        assert!(MediaKind::Audio.accepts("audio/ogg; codecs=opus"));
    }

    #[test]
    fn audio_rejects_unknown_formats() {
        assert!(!MediaKind::Audio.accepts("audio/amr"));
        assert!(!MediaKind::Audio.accepts("application/pdf"));
    }

    #[test]
    fn image_accepts_jpeg_and_png_only() {
        assert!(MediaKind::Image.accepts("image/jpeg"));
        assert!(MediaKind::Image.accepts("image/png"));
        assert!(!MediaKind::Image.accepts("image/webp"));
    }

    #[test]
    fn matching_ignores_case() {
        assert!(MediaKind::Image.accepts("IMAGE/JPEG"));
    }

    #[test]
    fn sentence_lists_formats_with_conjunction() {
        assert_eq!(
            MediaKind::Audio.allowed_formats_sentence(),
            "flac, mp3, mp4, mpeg, mpga, m4a, ogg, wav y webm"
        );
        assert_eq!(MediaKind::Image.allowed_formats_sentence(), "jpeg y png");
    }

    #[test]
    fn limit_is_25_mib() {
        assert_eq!(MAX_MEDIA_BYTES, 26_214_400);
    }
}
