//! Typed user commands parsed from message text and image captions

use serde::{Deserialize, Serialize};

use crate::rejection::Rejection;
use crate::value_objects::{BackgroundColor, MAX_ASCII_SIDE};

/// Commands a sender can issue in a text message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextCommand {
    /// `/voices [filter]`: list voices whose locale starts with the filter
    ListVoices { filter: Option<String> },
    /// `/voice <short_name>`: remember a voice for `/tts`
    SelectVoice { short_name: String },
    /// `/tts <text>`: synthesize text
    Speak { text: String },
    /// Anything else
    Help,
}

impl TextCommand {
    /// Parse a text message body
    ///
    /// The command is the first whitespace-separated token; the remainder,
    /// trimmed, is its argument.
    pub fn parse(body: &str) -> Result<Self, Rejection> {
        let body = body.trim();
        let (command, rest) = body
            .split_once(char::is_whitespace)
            .map_or((body, ""), |(command, rest)| (command, rest.trim()));

        match command.to_ascii_lowercase().as_str() {
            "/voices" => Ok(Self::ListVoices {
                filter: rest
                    .split_whitespace()
                    .next()
                    .map(ToString::to_string),
            }),
            "/voice" => match rest.split_whitespace().next() {
                Some(short_name) => Ok(Self::SelectVoice {
                    short_name: short_name.to_string(),
                }),
                None => Err(Rejection::MissingVoiceName),
            },
            "/tts" if rest.is_empty() => Err(Rejection::MissingTtsText),
            "/tts" => Ok(Self::Speak {
                text: rest.to_string(),
            }),
            _ => Ok(Self::Help),
        }
    }
}

/// Parameters of an ASCII-art conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AsciiArtOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Remove the background before rendering
    pub remove_background: bool,
    pub background: BackgroundColor,
}

/// Operation requested by an image caption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ImageCommand {
    /// Caption and OCR
    Describe,
    /// `/bg [bgcolor=<name>]`
    RemoveBackground { background: BackgroundColor },
    /// `/i2a [w=<n>] [h=<n>] [bg] [bgcolor=<name>]`
    AsciiArt(AsciiArtOptions),
}

impl ImageCommand {
    /// Parse an optional image caption
    ///
    /// Captions not starting with `/` describe the image. Parameters are
    /// `key=value` pairs or bare flags.
    pub fn parse(caption: Option<&str>) -> Result<Self, Rejection> {
        let Some(caption) = caption.map(str::trim).filter(|c| c.starts_with('/')) else {
            return Ok(Self::Describe);
        };

        let mut tokens = caption.split_whitespace();
        let operation = tokens
            .next()
            .map(|op| op.trim_start_matches('/'))
            .unwrap_or_default();
        let params = CaptionParams::collect(tokens);

        match operation {
            "bg" => Ok(Self::RemoveBackground {
                background: params.background(),
            }),
            "i2a" => Ok(Self::AsciiArt(AsciiArtOptions {
                width: params.dimension("w")?,
                height: params.dimension("h")?,
                remove_background: params.flag("bg"),
                background: params.background(),
            })),
            other => Err(Rejection::UnknownImageOperation {
                operation: other.to_string(),
            }),
        }
    }

    /// Short human-readable operation name for logs
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Describe => "image transcription",
            Self::RemoveBackground { .. } => "background removal",
            Self::AsciiArt(_) => "image to asciiart",
        }
    }
}

/// `key=value` pairs and bare flags of a caption, last occurrence wins
struct CaptionParams<'a> {
    pairs: Vec<(&'a str, Option<&'a str>)>,
}

impl<'a> CaptionParams<'a> {
    fn collect(tokens: impl Iterator<Item = &'a str>) -> Self {
        let pairs = tokens
            .map(|token| match token.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (token, None),
            })
            .collect();
        Self { pairs }
    }

    fn get(&self, key: &str) -> Option<Option<&'a str>> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    fn flag(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn background(&self) -> BackgroundColor {
        self.get("bgcolor")
            .flatten()
            .map(BackgroundColor::from_name)
            .unwrap_or_default()
    }

    fn dimension(&self, key: &str) -> Result<Option<u32>, Rejection> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let raw = value.unwrap_or_default();
        match raw.parse::<u32>() {
            Ok(n) if (1..=MAX_ASCII_SIDE).contains(&n) => Ok(Some(n)),
            _ => Err(Rejection::InvalidDimension {
                parameter: key.to_string(),
                value: raw.to_string(),
            }),
        }
    }
}
