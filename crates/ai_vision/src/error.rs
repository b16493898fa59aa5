//! Vision errors

use thiserror::Error;

/// Errors from the vision services and local image operations
#[derive(Debug, Error)]
pub enum VisionError {
    /// Failed to connect to the service
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request failed or returned a non-success status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Image could not be decoded, transformed or encoded
    #[error("Image processing failed: {0}")]
    Image(String),

    /// Request timed out
    #[error("Vision request timeout")]
    Timeout,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for VisionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

impl From<image::ImageError> for VisionError {
    fn from(err: image::ImageError) -> Self {
        Self::Image(err.to_string())
    }
}
