//! Text-to-speech voice chosen by a sender

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A synthesis voice: provider short name, locale and gender
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceSelection {
    pub short_name: String,
    pub locale: String,
    pub gender: String,
}

impl VoiceSelection {
    const SEPARATOR: char = '|';

    pub fn new(
        short_name: impl Into<String>,
        locale: impl Into<String>,
        gender: impl Into<String>,
    ) -> Self {
        Self {
            short_name: short_name.into(),
            locale: locale.into(),
            gender: gender.into(),
        }
    }

    /// Language part of the locale (`es` for `es-CO`)
    pub fn language(&self) -> &str {
        self.locale.split('-').next().unwrap_or(&self.locale)
    }

    /// Key-value store key holding a sender's voice
    pub fn store_key(sender: &str) -> String {
        format!("{sender}|voice_short_name|lang|gender")
    }

    /// Encode as `{short_name}|{locale}|{gender}`
    pub fn to_store_value(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            self.short_name,
            self.locale,
            self.gender,
            sep = Self::SEPARATOR
        )
    }

    /// Decode a value written by [`Self::to_store_value`]
    pub fn from_store_value(key: &str, value: &str) -> Result<Self, DomainError> {
        let mut parts = value.split(Self::SEPARATOR);
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(short_name), Some(locale), Some(gender), None)
                if !short_name.is_empty() && !locale.is_empty() =>
            {
                Ok(Self::new(short_name, locale, gender))
            },
            _ => Err(DomainError::invalid_stored_value(key, value)),
        }
    }
}

impl Default for VoiceSelection {
    fn default() -> Self {
        Self::new("es-CO-SalomeNeural", "es-CO", "Female")
    }
}

impl fmt::Display for VoiceSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.short_name, self.locale, self.gender)
    }
}
