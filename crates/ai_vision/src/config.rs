//! Configuration for the vision services

use serde::{Deserialize, Serialize};

/// Endpoints and credentials for Azure Vision and the ASCII-art service
#[derive(Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Azure AI Vision resource endpoint (e.g. `https://myres.cognitiveservices.azure.com`)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Azure AI Vision subscription key
    #[serde(default)]
    pub key: Option<String>,

    /// Base URL of the serverless platform hosting the ASCII-art action
    #[serde(default)]
    pub functions_endpoint: Option<String>,

    /// Namespace of the ASCII-art action
    #[serde(default)]
    pub functions_namespace: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl std::fmt::Debug for VisionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionConfig")
            .field("endpoint", &self.endpoint)
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .field("functions_endpoint", &self.functions_endpoint)
            .field("functions_namespace", &self.functions_namespace)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

const fn default_timeout_ms() -> u64 {
    60000
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            key: None,
            functions_endpoint: None,
            functions_namespace: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn present(value: Option<&String>, what: &str) -> Result<String, String> {
    value
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("{what} is required"))
}

impl VisionConfig {
    /// Azure endpoint without trailing slash
    pub fn azure_endpoint(&self) -> Result<String, String> {
        present(self.endpoint.as_ref(), "Azure Vision endpoint")
    }

    /// URL of the ASCII-art action
    pub fn ascii_art_url(&self) -> Result<String, String> {
        let endpoint = present(self.functions_endpoint.as_ref(), "Functions endpoint")?;
        let namespace = present(self.functions_namespace.as_ref(), "Functions namespace")?;
        Ok(format!("{endpoint}/api/v1/web/{namespace}/whatsapp/aic"))
    }

    /// Validate the Azure settings
    pub fn validate_azure(&self) -> Result<(), String> {
        self.azure_endpoint()?;
        present(self.key.as_ref(), "Azure Vision key")?;
        self.validate_timeout()
    }

    /// Validate the ASCII-art settings
    pub fn validate_ascii_art(&self) -> Result<(), String> {
        self.ascii_art_url()?;
        self.validate_timeout()
    }

    fn validate_timeout(&self) -> Result<(), String> {
        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_art_url_is_built_from_endpoint_and_namespace() {
        let config = VisionConfig {
            functions_endpoint: Some("https://faas.example.com/".into()),
            functions_namespace: Some("fn-123".into()),
            ..Default::default()
        };
        assert_eq!(
            config.ascii_art_url().unwrap(),
            "https://faas.example.com/api/v1/web/fn-123/whatsapp/aic"
        );
    }

    #[test]
    fn missing_values_fail_validation() {
        let config = VisionConfig::default();
        assert!(config.validate_azure().is_err());
        assert!(config.validate_ascii_art().is_err());

        let config = VisionConfig {
            endpoint: Some("https://vision.example.com".into()),
            key: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(config.validate_azure().unwrap_err(), "Azure Vision key is required");
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = VisionConfig {
            endpoint: Some("https://vision.example.com".into()),
            key: Some("vision-secret".into()),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("vision-secret"));
        assert!(debug.contains("key: Some(\"[REDACTED]\")"));
    }

    #[test]
    fn default_timeout() {
        assert_eq!(VisionConfig::default().timeout_ms, 60000);
    }
}
