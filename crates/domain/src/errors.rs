//! Domain-level errors

use thiserror::Error;

/// Errors raised while building domain values
#[derive(Debug, Error)]
pub enum DomainError {
    /// Invalid phone number format
    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(String),

    /// Stored value could not be decoded
    #[error("Invalid stored value for {key}: {value}")]
    InvalidStoredValue { key: String, value: String },
}

impl DomainError {
    /// Create an invalid stored value error
    pub fn invalid_stored_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidStoredValue {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_stored_value_creates_correct_error() {
        let err = DomainError::invalid_stored_value("+57300|voice", "broken");
        match err {
            DomainError::InvalidStoredValue { key, value } => {
                assert_eq!(key, "+57300|voice");
                assert_eq!(value, "broken");
            },
            _ => unreachable!("Expected InvalidStoredValue error"),
        }
    }

    #[test]
    fn invalid_stored_value_message() {
        let err = DomainError::invalid_stored_value("k", "v");
        assert_eq!(err.to_string(), "Invalid stored value for k: v");
    }

    #[test]
    fn invalid_phone_error_message() {
        let err = DomainError::InvalidPhoneNumber("123".to_string());
        assert_eq!(err.to_string(), "Invalid phone number: 123");
    }
}
