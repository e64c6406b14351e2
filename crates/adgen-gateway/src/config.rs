//! Gateway configuration.

use std::time::Duration;

use url::Url;

use crate::error::{GatewayError, GatewayResult};

const DEFAULT_API_BASE: &str = "https://api.kie.ai";
const DEFAULT_FILE_BASE: &str = "https://kieai.redpandaai.co";

/// Endpoint hosts and HTTP client tuning.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Render, status, download-URL, credit and chat endpoints
    pub api_base: String,
    /// Base64 upload endpoint
    pub file_base: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            file_base: DEFAULT_FILE_BASE.to_string(),
            timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl GatewayConfig {
    /// Create config from environment variables.
    pub fn from_env() -> GatewayResult<Self> {
        let config = Self {
            api_base: std::env::var("KIE_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            file_base: std::env::var("KIE_FILE_BASE")
                .unwrap_or_else(|_| DEFAULT_FILE_BASE.to_string()),
            timeout: Duration::from_secs(
                std::env::var("KIE_HTTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
            connect_timeout: Duration::from_secs(
                std::env::var("KIE_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
        };
        config.validate()?;
        Ok(config)
    }

    /// Point both hosts at one base URL (mock servers, proxies).
    pub fn with_base_url(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            api_base: base.clone(),
            file_base: base,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> GatewayResult<()> {
        for (name, value) in [("KIE_API_BASE", &self.api_base), ("KIE_FILE_BASE", &self.file_base)] {
            Url::parse(value)
                .map_err(|e| GatewayError::config_error(format!("{name} is not a valid URL: {e}")))?;
        }
        Ok(())
    }

    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }

    pub(crate) fn file_url(&self, path: &str) -> String {
        format!("{}{}", self.file_base.trim_end_matches('/'), path)
    }
}
