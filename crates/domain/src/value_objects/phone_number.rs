//! Phone number value object with E.164 validation

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A validated phone number in E.164 format (e.g., +573001234567)
///
/// WhatsApp reports senders as bare digits (`wa_id`); replies are addressed
/// to the `+`-prefixed form, which is also the key used for per-sender state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber {
    value: String,
}

impl PhoneNumber {
    /// Create a new phone number, validating E.164 format
    ///
    /// - Starts with +
    /// - Contains only digits after +
    /// - Length: 7-15 digits (including country code)
    pub fn new(number: impl Into<String>) -> Result<Self, DomainError> {
        let value = number.into().trim().replace([' ', '-', '(', ')'], "");

        let Some(digits) = value.strip_prefix('+') else {
            return Err(DomainError::InvalidPhoneNumber(
                "Phone number must start with +".to_string(),
            ));
        };

        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::InvalidPhoneNumber(
                "Phone number must contain only digits after +".to_string(),
            ));
        }

        if digits.len() < 7 || digits.len() > 15 {
            return Err(DomainError::InvalidPhoneNumber(
                "Phone number must have 7-15 digits".to_string(),
            ));
        }

        Ok(Self { value })
    }

    /// Build from a WhatsApp `wa_id` (digits without the leading `+`)
    pub fn from_wa_id(wa_id: &str) -> Result<Self, DomainError> {
        Self::new(format!("+{}", wa_id.trim()))
    }

    /// Get the phone number as a string slice (E.164 format)
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Get digits only (without +)
    pub fn digits(&self) -> &str {
        &self.value[1..]
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl TryFrom<&str> for PhoneNumber {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wa_id_gets_plus_prefix() {
        let phone = PhoneNumber::from_wa_id("573001234567").unwrap();
        assert_eq!(phone.as_str(), "+573001234567");
        assert_eq!(phone.digits(), "573001234567");
    }

    #[test]
    fn valid_e164_number_is_accepted() {
        let phone = PhoneNumber::new("+491234567890").unwrap();
        assert_eq!(phone.as_str(), "+491234567890");
    }

    #[test]
    fn number_with_spaces_is_normalized() {
        let phone = PhoneNumber::new("+57 300 123 4567").unwrap();
        assert_eq!(phone.as_str(), "+573001234567");
    }

    #[test]
    fn number_without_plus_is_rejected() {
        assert!(PhoneNumber::new("573001234567").is_err());
    }

    #[test]
    fn wa_id_with_letters_is_rejected() {
        assert!(PhoneNumber::from_wa_id("57300abc").is_err());
    }

    #[test]
    fn too_short_and_too_long_are_rejected() {
        assert!(PhoneNumber::from_wa_id("12345").is_err());
        assert!(PhoneNumber::from_wa_id("12345678901234567890").is_err());
    }

    #[test]
    fn display_format() {
        let phone = PhoneNumber::from_wa_id("573001234567").unwrap();
        assert_eq!(phone.to_string(), "+573001234567");
    }

    #[test]
    fn serialization_is_transparent() {
        let phone = PhoneNumber::from_wa_id("573001234567").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"+573001234567\"");
        let parsed: PhoneNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(phone, parsed);
    }
}
