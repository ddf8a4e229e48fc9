//! Process-wide DM API endpoint
//!
//! The endpoint is read from `SQUONK_API_URL` the first time it is needed and
//! can be replaced at any time with [`set_api_url`]. Every [`crate::DmApi`]
//! created with [`crate::DmApi::new`] resolves it again for each request.

use crate::{
    Result,
    config::settings::{ApiSettings, validate_api_url},
};
use once_cell::sync::Lazy;
use std::sync::{PoisonError, RwLock};

static API_ENDPOINT: Lazy<RwLock<ApiSettings>> = Lazy::new(|| {
    let settings = ApiSettings::from_env();
    tracing::debug!("Initial API endpoint from environment: {:?}", settings);
    RwLock::new(settings)
});

/// Set the DM API URL, verifying the server's TLS certificate.
///
/// Replaces the value otherwise taken from the `SQUONK_API_URL` environment
/// variable.
///
/// ```rust
/// dm_api::config::set_api_url("https://example.com/data-manager-api")?;
///
/// let api = dm_api::config::get_api_url();
/// assert_eq!(api.url.as_deref(), Some("https://example.com/data-manager-api"));
/// assert!(api.verify_ssl_cert);
/// # Ok::<(), dm_api::Error>(())
/// ```
pub fn set_api_url(url: &str) -> Result<()> {
    set_api_url_with_verify(url, true)
}

/// Set the DM API URL and whether its TLS certificate is verified.
///
/// Both values are replaced. An empty or malformed URL is rejected and the
/// current configuration is kept.
pub fn set_api_url_with_verify(url: &str, verify_ssl_cert: bool) -> Result<()> {
    validate_api_url(url)?;

    if !verify_ssl_cert {
        tracing::warn!("TLS certificate verification disabled for {}", url);
    }

    let mut endpoint = API_ENDPOINT
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    *endpoint = ApiSettings {
        url: Some(url.to_string()),
        verify_ssl_cert,
    };
    Ok(())
}

/// Return the current DM API URL and certificate verification flag
pub fn get_api_url() -> ApiSettings {
    API_ENDPOINT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Discard any explicit setting and read the endpoint from the environment again
pub fn reset_api_url() {
    let settings = ApiSettings::from_env();
    let mut endpoint = API_ENDPOINT
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    *endpoint = settings;
}
