//! Upstream configuration.

use thiserror::Error;
use url::Url;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Where the proxy sends its requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Upstream API root. Always `http(s)` and always ends with `/`, so
    /// relative paths join beneath it rather than replacing its last segment.
    pub base_url: Url,
}

impl ProxyConfig {
    /// Parse and normalize an upstream base URL.
    pub fn new(raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason,
        };

        let mut base_url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid(format!(
                "unsupported scheme '{}'",
                base_url.scheme()
            )));
        }
        if base_url.cannot_be_a_base() {
            return Err(invalid("URL cannot be used as a base".into()));
        }

        base_url.set_query(None);
        base_url.set_fragment(None);
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { base_url })
    }
}
