//! Service health, version and user account operations

use super::{DmApi, request::ApiRequest, require};
use crate::Result;
use reqwest::StatusCode;
use serde_json::Value;

impl DmApi {
    /// A handy method to check the DM API is responding
    pub async fn ping(&self, access_token: &str) -> Result<Value> {
        require(access_token, "access_token")?;

        let response = self
            .send(ApiRequest::get("/account-server/namespace", "Failed ping").bearer(access_token))
            .await?;
        Ok(response.json_or_empty())
    }

    /// Return the DM API service version
    pub async fn get_version(&self, access_token: &str) -> Result<Value> {
        require(access_token, "access_token")?;

        let response = self
            .send(ApiRequest::get("/version", "Failed getting version").bearer(access_token))
            .await?;
        Ok(response.json_or_empty())
    }

    /// Add or remove the `become-admin` state of your account.
    ///
    /// Only accounts with administrative capabilities can do this. An
    /// optional `impersonate` username switches to that user.
    pub async fn set_admin_state(
        &self,
        access_token: &str,
        admin: bool,
        impersonate: Option<&str>,
    ) -> Result<Value> {
        require(access_token, "access_token")?;

        let mut request = ApiRequest::patch("/user/account", "Failed to set the admin state")
            .bearer(access_token)
            .expect(&[StatusCode::NO_CONTENT])
            .form("become_admin", admin);
        if let Some(user) = impersonate.filter(|user| !user.is_empty()) {
            request = request.form("impersonate", user);
        }

        let response = self.send(request).await?;
        Ok(response.json_or_empty())
    }
}
