//! # DM API client
//!
//! [`DmApi`] provides high-level, simplified access to the Data Manager API:
//! **Projects**, **Files**, **Jobs**, **Instances** and **Tasks**.
//!
//! ## Endpoint resolution
//!
//! A client created with [`DmApi::new`] follows the process-wide endpoint
//! (see [`crate::config::set_api_url`]), resolving it for every request, so
//! a later `set_api_url` call affects clients that already exist. A client
//! created with [`DmApi::with_settings`] is pinned to the endpoint it was
//! given.
//!
//! ## Responses
//!
//! Successful calls return the response body as JSON, or an empty object
//! when the DM API sends no JSON. Any status code the operation does not
//! expect becomes [`Error::UnexpectedStatus`].
//!
//! ## Examples
//!
//! ```rust,no_run
//! use dm_api::DmApi;
//!
//! # tokio_test::block_on(async {
//! dm_api::config::set_api_url("https://example.com/data-manager-api")?;
//!
//! let api = DmApi::new();
//! let version = api.get_version("access-token").await?;
//! println!("DM-API version={}", version["version"]);
//! # Ok::<(), dm_api::Error>(())
//! # });
//! ```

mod account;
mod files;
mod instances;
mod jobs;
mod projects;
pub(crate) mod request;

pub use jobs::{DM_JOB_APPLICATION_ID, TEST_PRODUCT_ID};

use crate::{
    Error, Result,
    auth::{AccessTokenProvider, KeycloakCredentials},
    config::{self, ApiSettings, Settings, TimeoutSettings},
    utils::user_agent,
};
use once_cell::sync::OnceCell;
use reqwest::Client;
use request::{ApiRequest, ApiResponse};
use tracing::{debug, warn};

/// Data Manager API client
#[derive(Debug)]
pub struct DmApi {
    /// Pinned endpoint, or `None` to follow the process-wide configuration
    endpoint: Option<ApiSettings>,
    /// Request timeouts
    timeouts: TimeoutSettings,
    /// HTTP clients, one per certificate verification mode
    clients: HttpClients,
    /// Keycloak access token source
    tokens: AccessTokenProvider,
}

impl DmApi {
    /// Create a client that follows the process-wide endpoint
    pub fn new() -> Self {
        Self {
            endpoint: None,
            timeouts: TimeoutSettings::default(),
            clients: HttpClients::default(),
            tokens: AccessTokenProvider::default(),
        }
    }

    /// Create a client pinned to the endpoint and timeouts in `settings`
    pub fn with_settings(settings: &Settings) -> Self {
        Self {
            endpoint: Some(settings.api.clone()),
            timeouts: settings.timeouts.clone(),
            clients: HttpClients::default(),
            tokens: AccessTokenProvider::new(settings.timeouts.request()),
        }
    }

    /// Replace the request timeouts
    pub fn with_timeouts(mut self, timeouts: TimeoutSettings) -> Self {
        self.tokens = AccessTokenProvider::new(timeouts.request());
        self.timeouts = timeouts;
        self
    }

    /// The endpoint the next request will use
    pub fn endpoint(&self) -> ApiSettings {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => config::get_api_url(),
        }
    }

    /// The request timeouts in use
    pub fn timeouts(&self) -> &TimeoutSettings {
        &self.timeouts
    }

    /// Get a DM API access token from Keycloak, reusing `prior_token` while
    /// it has at least a minute left.
    pub async fn get_access_token(
        &self,
        credentials: &KeycloakCredentials,
        prior_token: Option<&str>,
    ) -> Result<String> {
        self.tokens.get_access_token(credentials, prior_token).await
    }

    /// Fail early when no endpoint URL is configured
    fn require_api_url(&self) -> Result<()> {
        match self.endpoint().url {
            Some(_) => Ok(()),
            None => Err(Error::NoApiUrl),
        }
    }

    /// Send a request to the DM API, checking the response code
    pub(crate) async fn send(&self, request: ApiRequest<'_>) -> Result<ApiResponse> {
        let endpoint = self.endpoint();
        let base_url = endpoint.url.as_deref().ok_or(Error::NoApiUrl)?;
        let url = format!("{}{}", base_url.trim_end_matches('/'), request.endpoint);

        let client = self.clients.get(endpoint.verify_ssl_cert)?;
        let mut builder = client
            .request(request.method.clone(), &url)
            .timeout(request.timeout.unwrap_or_else(|| self.timeouts.request()));

        if let Some(access_token) = request.access_token {
            builder = builder.bearer_auth(access_token);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }
        if let Some(form) = request.multipart {
            builder = builder.multipart(form);
        }

        debug!("{} {}", request.method, url);
        let response = builder.send().await.map_err(|e| {
            warn!("{} ({})", request.context, e);
            Error::Network(e)
        })?;

        let status = response.status();
        if !request.expected.contains(&status) {
            warn!("{} (status={} url={})", request.context, status, url);
            return Err(Error::unexpected_status(request.context, status.as_u16()));
        }

        let body = response.bytes().await?.to_vec();
        Ok(ApiResponse { status, body })
    }
}

impl Default for DmApi {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazily built HTTP clients, reused across requests
#[derive(Debug, Default)]
struct HttpClients {
    verifying: OnceCell<Client>,
    insecure: OnceCell<Client>,
}

impl HttpClients {
    fn get(&self, verify_ssl_cert: bool) -> Result<&Client> {
        let cell = if verify_ssl_cert {
            &self.verifying
        } else {
            &self.insecure
        };
        cell.get_or_try_init(|| build_http_client(verify_ssl_cert))
    }
}

/// Build an HTTP client, optionally accepting invalid TLS certificates
pub(crate) fn build_http_client(verify_ssl_cert: bool) -> Result<Client> {
    let client = Client::builder()
        .user_agent(user_agent())
        .danger_accept_invalid_certs(!verify_ssl_cert)
        .build()?;
    Ok(client)
}

/// Reject an empty required argument
pub(crate) fn require(value: &str, name: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::invalid_argument(format!("{} must not be empty", name)));
    }
    Ok(())
}

/// Project paths are relative to the project root and must begin `/`
pub(crate) fn require_project_path(project_path: &str) -> Result<()> {
    if !project_path.starts_with('/') {
        return Err(Error::invalid_argument(format!(
            "Project path must begin '/' ({})",
            project_path
        )));
    }
    Ok(())
}
