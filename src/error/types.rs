//! Error type definitions
//!
//! Defines the main error types used throughout the Data Manager API client.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the Data Manager API client
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// No API URL has been set, explicitly or through the environment
    #[error("No API URL defined")]
    NoApiUrl,

    /// A caller-supplied argument failed a precondition
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The DM API answered with a status code the operation does not accept
    #[error("{context} (status={status})")]
    UnexpectedStatus { context: String, status: u16 },

    /// A local file to upload does not exist
    #[error("No such file ({})", .0.display())]
    NoSuchFile(PathBuf),

    /// The Job operator is missing or its version could not be obtained
    #[error("Job operator error: {0}")]
    JobOperator(String),

    /// Keycloak access token errors
    #[error("Access token error: {0}")]
    Token(String),

    /// JWT decoding errors
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Network/HTTP client errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration file parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an unexpected status error
    pub fn unexpected_status(context: impl Into<String>, status: u16) -> Self {
        Self::UnexpectedStatus {
            context: context.into(),
            status,
        }
    }

    /// Create a job operator error
    pub fn job_operator(msg: impl Into<String>) -> Self {
        Self::JobOperator(msg.into())
    }

    /// Create an access token error
    pub fn token(msg: impl Into<String>) -> Self {
        Self::Token(msg.into())
    }

    /// The HTTP status returned by the DM API, if that is what failed
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
