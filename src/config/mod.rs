//! Configuration management for the DM API client
//!
//! This module holds the process-wide API endpoint and the settings used by
//! the client and the command line tool.

pub mod global;
pub mod loader;
pub mod settings;

pub use global::{get_api_url, reset_api_url, set_api_url, set_api_url_with_verify};
pub use loader::ConfigLoader;
pub use settings::{API_URL_ENV_VAR, ApiSettings, LoggingSettings, Settings, TimeoutSettings};
