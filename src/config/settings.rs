//! Configuration settings structure
//!
//! Defines the main settings structure and loading logic for the DM API client.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable holding the default DM API URL
pub const API_URL_ENV_VAR: &str = "SQUONK_API_URL";

/// Environment variable overriding the default request timeout (seconds)
pub const API_TIMEOUT_ENV_VAR: &str = "SQUONK_API_TIMEOUT_S";

/// Main configuration settings for the DM API client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// API endpoint configuration
    pub api: ApiSettings,
    /// Request timeouts
    pub timeouts: TimeoutSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// The DM API endpoint: where it is and whether its certificate is checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL, typically `https://example.com/data-manager-api`
    pub url: Option<String>,
    /// Verify the server's TLS certificate
    pub verify_ssl_cert: bool,
}

/// Request timeouts, in whole seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutSettings {
    /// Default timeout for a single request
    pub request_s: u64,
    /// Listing and downloading project files
    pub file_list_s: u64,
    /// Uploading one file
    pub file_upload_s: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log filter used when `RUST_LOG` is unset, e.g. `warn` or `dm_api=debug`
    pub level: String,
    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            url: None,
            verify_ssl_cert: true,
        }
    }
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            request_s: 4,
            file_list_s: 8,
            file_upload_s: 120,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            verbose: false,
        }
    }
}

impl ApiSettings {
    /// Endpoint settings for an explicit URL with certificate verification on
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            verify_ssl_cert: true,
        }
    }

    /// Set the certificate verification flag
    pub fn with_verify_ssl_cert(mut self, verify_ssl_cert: bool) -> Self {
        self.verify_ssl_cert = verify_ssl_cert;
        self
    }

    /// Load endpoint settings from `SQUONK_API_URL`.
    ///
    /// An unset or empty variable leaves the URL undefined. Certificate
    /// verification is always on; only an explicit setting turns it off.
    pub fn from_env() -> Self {
        let url = std::env::var(API_URL_ENV_VAR)
            .ok()
            .filter(|url| !url.is_empty());

        Self {
            url,
            verify_ssl_cert: true,
        }
    }
}

impl TimeoutSettings {
    /// Default request timeout
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_s)
    }

    /// Timeout for listing and downloading project files
    pub fn file_list(&self) -> Duration {
        Duration::from_secs(self.file_list_s)
    }

    /// Timeout for uploading a single file
    pub fn file_upload(&self) -> Duration {
        Duration::from_secs(self.file_upload_s)
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from environment variables
    pub fn from_env() -> crate::Result<Self> {
        Self::default().merge_with_env()
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Override these settings with any values present in the environment
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        if let Some(url) = ApiSettings::from_env().url {
            self.api.url = Some(url);
        }

        if let Ok(timeout) = std::env::var(API_TIMEOUT_ENV_VAR) {
            self.timeouts.request_s = timeout
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid timeout: {}", e)))?;
        }

        Ok(self)
    }

    /// Check the settings are usable
    pub fn validate(&self) -> crate::Result<()> {
        if let Some(url) = &self.api.url {
            validate_api_url(url)?;
        }
        if self.timeouts.request_s == 0
            || self.timeouts.file_list_s == 0
            || self.timeouts.file_upload_s == 0
        {
            return Err(crate::Error::config("Timeouts must be greater than zero"));
        }
        Ok(())
    }
}

/// Check a DM API URL is an absolute `http` or `https` URL
pub fn validate_api_url(url: &str) -> crate::Result<()> {
    if url.is_empty() {
        return Err(crate::Error::config("API URL must not be empty"));
    }
    let parsed = Url::parse(url)?;
    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(()),
        "http" | "https" => Err(crate::Error::config(format!("API URL has no host: {}", url))),
        scheme => Err(crate::Error::config(format!(
            "Unsupported API URL scheme '{}': {}",
            scheme, url
        ))),
    }
}
