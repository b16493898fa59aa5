//! Application-level errors

use domain::{DomainError, Rejection};
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The sender's request cannot be served; relayed to them as text
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// The user-facing rejection, if this is one
    pub const fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }

    /// Whether this is a system failure rather than a rejection
    pub const fn is_system_failure(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_is_not_a_system_failure() {
        let err: ApplicationError = Rejection::MissingTtsText.into();
        assert!(!err.is_system_failure());
        assert_eq!(err.rejection(), Some(&Rejection::MissingTtsText));
    }

    #[test]
    fn external_service_is_a_system_failure() {
        let err = ApplicationError::ExternalService("boom".into());
        assert!(err.is_system_failure());
        assert!(err.rejection().is_none());
        assert_eq!(err.to_string(), "External service error: boom");
    }

    #[test]
    fn rejection_displays_user_text() {
        let err: ApplicationError = Rejection::UnsupportedMessageType {
            message_type: "sticker".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Lo siento, no puedo procesar este mensaje de tipo: `sticker`"
        );
    }

    #[test]
    fn domain_error_converts() {
        let err: ApplicationError = DomainError::invalid_stored_value("k", "v").into();
        assert!(matches!(err, ApplicationError::Domain(_)));
    }
}
