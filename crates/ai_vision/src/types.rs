//! Types for vision processing

use serde::{Deserialize, Serialize};

/// Caption and OCR text of an analysed image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageAnalysis {
    /// Caption generated for the image
    pub caption: Option<String>,
    /// OCR text, lines joined by `\n`, blocks by `\n\n`
    pub read_text: String,
}

impl ImageAnalysis {
    /// OCR text when any was read, otherwise the caption
    #[must_use]
    pub fn text(&self) -> &str {
        if self.read_text.trim().is_empty() {
            self.caption.as_deref().unwrap_or_default()
        } else {
            &self.read_text
        }
    }
}

/// Image returned by background removal
#[derive(Clone, PartialEq, Eq)]
pub struct SegmentedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl std::fmt::Debug for SegmentedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentedImage")
            .field("data", &format_args!("[{} bytes]", self.data.len()))
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// Payload of an ASCII-art conversion
///
/// `media_id` names the staged object; the service reads `{media_id}.jpeg`
/// from object storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsciiArtJob {
    pub media_id: String,
    pub width: u32,
    pub height: u32,
    pub background_color_name: String,
}
