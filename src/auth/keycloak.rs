//! Keycloak access tokens
//!
//! Tokens are obtained with the OpenID Connect password grant. A prior token
//! is handed back while it has at least [`PRIOR_TOKEN_MIN_REMAINING_S`]
//! seconds left. Checking a prior token needs the realm's public key,
//! fetched once per realm.

use crate::{
    Error, Result,
    client::build_http_client,
    types::{RealmInfo, TokenClaims, TokenResponse},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, Validation, decode, decode_header};
use once_cell::sync::OnceCell;
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

/// A prior token with less than this many seconds left is replaced
pub const PRIOR_TOKEN_MIN_REMAINING_S: i64 = 60;

/// Where and how to obtain a DM API access token
#[derive(Clone)]
pub struct KeycloakCredentials {
    /// Keycloak server URL, typically `https://example.com/auth`
    pub url: String,
    /// Keycloak realm
    pub realm: String,
    /// The realm's DM API client ID
    pub client_id: String,
    /// User name
    pub username: String,
    /// User password
    pub password: String,
}

impl KeycloakCredentials {
    /// Create a set of credentials
    pub fn new(
        url: impl Into<String>,
        realm: impl Into<String>,
        client_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            realm: realm.into(),
            client_id: client_id.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// The realm URL, `{url}/realms/{realm}`
    pub fn realm_url(&self) -> String {
        format!("{}/realms/{}", self.url.trim_end_matches('/'), self.realm)
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("keycloak_url", &self.url),
            ("keycloak_realm", &self.realm),
            ("keycloak_client_id", &self.client_id),
            ("username", &self.username),
            ("password", &self.password),
        ];
        for (name, value) in fields {
            crate::client::require(value, name)?;
        }
        Ok(())
    }
}

impl fmt::Debug for KeycloakCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeycloakCredentials")
            .field("url", &self.url)
            .field("realm", &self.realm)
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The public key of the most recently used realm
struct RealmKey {
    realm_url: String,
    key: DecodingKey,
}

/// Obtains (and re-uses) Keycloak access tokens
pub struct AccessTokenProvider {
    client: OnceCell<Client>,
    timeout: Duration,
    realm_key: Mutex<Option<RealmKey>>,
}

impl AccessTokenProvider {
    /// Create a provider whose Keycloak requests use `timeout`
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: OnceCell::new(),
            timeout,
            realm_key: Mutex::new(None),
        }
    }

    /// Get a DM API access token.
    ///
    /// When `prior_token` is given it is returned unchanged if it still has
    /// at least a minute left. Otherwise, or if it cannot be decoded with the
    /// realm's key, a new token is requested.
    pub async fn get_access_token(
        &self,
        credentials: &KeycloakCredentials,
        prior_token: Option<&str>,
    ) -> Result<String> {
        credentials.validate()?;

        let realm_url = credentials.realm_url();
        let mut realm_key = self.realm_key.lock().await;

        if let Some(prior_token) = prior_token.filter(|token| !token.is_empty()) {
            let known_realm = matches!(realm_key.as_ref(), Some(k) if k.realm_url == realm_url);
            if !known_realm {
                let key = self.fetch_realm_key(&realm_url).await?;
                *realm_key = Some(RealmKey {
                    realm_url: realm_url.clone(),
                    key,
                });
            }

            if let Some(current) = realm_key.as_ref() {
                match remaining_lifetime(prior_token, &current.key) {
                    Ok(remaining) if remaining >= PRIOR_TOKEN_MIN_REMAINING_S => {
                        debug!("Re-using prior token ({}s remaining)", remaining);
                        return Ok(prior_token.to_string());
                    }
                    Ok(remaining) => {
                        debug!("Prior token has {}s remaining, getting a new one", remaining)
                    }
                    Err(e) => warn!("Could not decode prior token ({}), getting a new one", e),
                }
            }
        }

        self.request_token(credentials, &realm_url).await
    }

    fn client(&self) -> Result<&Client> {
        self.client.get_or_try_init(|| build_http_client(true))
    }

    async fn fetch_realm_key(&self, realm_url: &str) -> Result<DecodingKey> {
        debug!("Getting public key for {}", realm_url);
        let response = self
            .client()?
            .get(realm_url)
            .timeout(self.timeout)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(Error::token(format!(
                "Failed to get realm information from {} (status={})",
                realm_url,
                response.status()
            )));
        }

        let realm: RealmInfo = response.json().await?;
        if realm.public_key.is_empty() {
            return Err(Error::token(format!("No public key for {}", realm_url)));
        }
        let pem = format!(
            "-----BEGIN PUBLIC KEY-----\n{}\n-----END PUBLIC KEY-----",
            realm.public_key
        );
        Ok(DecodingKey::from_rsa_pem(pem.as_bytes())?)
    }

    async fn request_token(
        &self,
        credentials: &KeycloakCredentials,
        realm_url: &str,
    ) -> Result<String> {
        let url = format!("{}/protocol/openid-connect/token", realm_url);
        let form = [
            ("client_id", credentials.client_id.as_str()),
            ("grant_type", "password"),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];

        let response = self
            .client()?
            .post(&url)
            .form(&form)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to get response from Keycloak ({})", e);
                Error::Network(e)
            })?;

        let status = response.status();
        let text = response.text().await?;
        if status != StatusCode::OK {
            error!("Failed to get token status_code={} text={}", status, text);
            return Err(Error::token(format!(
                "Keycloak refused the token request (status={})",
                status.as_u16()
            )));
        }

        let token: TokenResponse = serde_json::from_str(&text)
            .map_err(|_| Error::token("No access_token in Keycloak response"))?;
        Ok(token.access_token)
    }
}

impl Default for AccessTokenProvider {
    fn default() -> Self {
        Self::new(Duration::from_secs(4))
    }
}

impl fmt::Debug for AccessTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokenProvider")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Seconds until `token` expires, after checking its signature with `key`
fn remaining_lifetime(token: &str, key: &DecodingKey) -> Result<i64> {
    let header = decode_header(token)?;
    let mut validation = Validation::new(header.alg);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["exp"]);

    let data = decode::<TokenClaims>(token, key, &validation)?;
    Ok(data.claims.exp - Utc::now().timestamp())
}
