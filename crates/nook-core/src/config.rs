//! Client configuration model.

use crate::error::{NookError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Root configuration, stored as `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to.
    pub api_base_url: String,
    /// Page size requested by every list view.
    pub page_size: u32,
    /// Per-request timeout applied by the HTTP transport.
    pub request_timeout_secs: u64,
    /// Overrides the default location of the persisted session file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            token_file: None,
        }
    }
}

impl ClientConfig {
    /// Checks the values that would otherwise fail later in confusing ways.
    pub fn validate(&self) -> Result<()> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(NookError::config(format!(
                "api_base_url must start with http:// or https:// (got '{}')",
                self.api_base_url
            )));
        }
        if self.page_size == 0 {
            return Err(NookError::config("page_size must be greater than zero"));
        }
        if self.request_timeout_secs == 0 {
            return Err(NookError::config("request_timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim().trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ClientConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ClientConfig =
            toml::from_str(r#"api_base_url = "https://nook.example/api/""#).unwrap();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.base_url(), "https://nook.example/api");
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let config = ClientConfig {
            page_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(NookError::Config(_))));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let config = ClientConfig {
            api_base_url: "localhost:5000".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
