//! Project operations

use super::{DmApi, request::ApiRequest, require};
use crate::Result;
use reqwest::StatusCode;
use serde_json::Value;

impl DmApi {
    /// Create a Project.
    ///
    /// `tier_product_id` comes from the Account Server. Administrative users
    /// can use [`crate::TEST_PRODUCT_ID`], which is always accepted.
    pub async fn create_project(
        &self,
        access_token: &str,
        project_name: &str,
        tier_product_id: &str,
    ) -> Result<Value> {
        require(access_token, "access_token")?;
        require(project_name, "project_name")?;
        require(tier_product_id, "tier_product_id")?;

        let request = ApiRequest::post("/project", "Failed creating project")
            .bearer(access_token)
            .expect(&[StatusCode::CREATED])
            .form("tier_product_id", tier_product_id)
            .form("name", project_name);
        Ok(self.send(request).await?.json_or_empty())
    }

    /// Delete a Project
    pub async fn delete_project(&self, access_token: &str, project_id: &str) -> Result<Value> {
        require(access_token, "access_token")?;
        require(project_id, "project_id")?;

        let request = ApiRequest::delete(
            format!("/project/{}", project_id),
            "Failed deleting project",
        )
        .bearer(access_token);
        Ok(self.send(request).await?.json_or_empty())
    }

    /// Information about all the Projects available to you
    pub async fn get_available_projects(&self, access_token: &str) -> Result<Value> {
        require(access_token, "access_token")?;

        let request = ApiRequest::get("/project", "Failed to get projects").bearer(access_token);
        Ok(self.send(request).await?.json_or_empty())
    }

    /// Detailed information about a specific Project
    pub async fn get_project(&self, access_token: &str, project_id: &str) -> Result<Value> {
        require(access_token, "access_token")?;
        require(project_id, "project_id")?;

        let request = ApiRequest::get(format!("/project/{}", project_id), "Failed to get project")
            .bearer(access_token);
        Ok(self.send(request).await?.json_or_empty())
    }
}
