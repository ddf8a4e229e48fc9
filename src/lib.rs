//! Data Manager API client - Rust Implementation
//!
//! Simplified access to the Squonk Data Manager API (the "DM API") to work
//! with **Projects**, **Files**, **Jobs**, **Instances** and **Tasks**.
//!
//! # Configuration
//!
//! The DM API URL is picked up from the `SQUONK_API_URL` environment
//! variable, expected to be of the form
//! `https://example.com/data-manager-api`. If the variable isn't set the URL
//! must be set programmatically with [`set_api_url`] before any API method
//! is used; until then every call fails with [`Error::NoApiUrl`].
//!
//! ```rust,no_run
//! // Verify the server's TLS certificate (the default)
//! dm_api::set_api_url("https://example.com/data-manager-api")?;
//!
//! // Or don't, for servers with self-signed certificates
//! dm_api::set_api_url_with_verify("https://example.com/data-manager-api", false)?;
//!
//! let api = dm_api::get_api_url();
//! assert!(!api.verify_ssl_cert);
//! # Ok::<(), dm_api::Error>(())
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use dm_api::{DmApi, KeycloakCredentials};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let api = DmApi::new();
//! let credentials = KeycloakCredentials::new(
//!     "https://example.com/auth",
//!     "squonk",
//!     "data-manager-api",
//!     "user",
//!     "password",
//! );
//! let token = api.get_access_token(&credentials, None).await?;
//!
//! api.ping(&token).await?;
//! let projects = api.get_available_projects(&token).await?;
//! println!("{}", projects);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use auth::{AccessTokenProvider, KeycloakCredentials};
pub use client::{DM_JOB_APPLICATION_ID, DmApi, TEST_PRODUCT_ID};
pub use config::{ApiSettings, Settings, get_api_url, set_api_url, set_api_url_with_verify};
pub use error::{Error, Result};
pub use types::{JobSpecification, StartJobOptions};
