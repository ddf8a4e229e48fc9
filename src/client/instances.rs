//! Instance (Application or Job) and Task operations

use super::{DmApi, jobs::DM_JOB_APPLICATION_ID, request::ApiRequest, require};
use crate::{
    Result,
    types::{JobSpecification, StartJobOptions},
};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::info;

impl DmApi {
    /// Start a Job Instance in a Project.
    ///
    /// The latest Job operator version is looked up first. On success the
    /// response carries the new `instance_id` and the `task_id` of the Task
    /// running it.
    pub async fn start_job_instance(
        &self,
        access_token: &str,
        project_id: &str,
        name: &str,
        specification: &JobSpecification,
        options: &StartJobOptions,
    ) -> Result<Value> {
        require(access_token, "access_token")?;
        require(project_id, "project_id")?;
        require(name, "name")?;

        let application_version = self.latest_job_operator_version(access_token).await?;

        let request = ApiRequest::post("/instance", "Failed to start instance")
            .bearer(access_token)
            .expect(&[StatusCode::CREATED])
            .form("application_id", DM_JOB_APPLICATION_ID)
            .form("application_version", &application_version)
            .form("as_name", name)
            .form("project_id", project_id)
            .form("specification", serde_json::to_string(specification)?)
            .form_fields(options.form_fields());

        let started = self.send(request).await?.json_or_empty();
        info!(
            "Started {}/{}/{} in {} (operator {})",
            specification.collection,
            specification.job,
            specification.version,
            project_id,
            application_version
        );
        Ok(started)
    }

    /// Information about an Instance
    pub async fn get_instance(&self, access_token: &str, instance_id: &str) -> Result<Value> {
        require(access_token, "access_token")?;
        require(instance_id, "instance_id")?;

        let request = ApiRequest::get(
            format!("/instance/{}", instance_id),
            "Failed to get instance",
        )
        .bearer(access_token);
        Ok(self.send(request).await?.json_or_empty())
    }

    /// Information about all the Instances in a Project
    pub async fn get_project_instances(
        &self,
        access_token: &str,
        project_id: &str,
    ) -> Result<Value> {
        require(access_token, "access_token")?;
        require(project_id, "project_id")?;

        let request = ApiRequest::get("/instance", "Failed to get project instances")
            .bearer(access_token)
            .query("project_id", project_id);
        Ok(self.send(request).await?.json_or_empty())
    }

    /// Delete an Instance.
    ///
    /// The container is removed along with the instance-specific directory
    /// in the root of the Project, and any files in it.
    pub async fn delete_instance(&self, access_token: &str, instance_id: &str) -> Result<Value> {
        require(access_token, "access_token")?;
        require(instance_id, "instance_id")?;

        let request = ApiRequest::delete(
            format!("/instance/{}", instance_id),
            "Failed to delete instance",
        )
        .bearer(access_token);
        Ok(self.send(request).await?.json_or_empty())
    }

    /// Delete an Instance **callback token**.
    ///
    /// Not authenticated, so no access token is needed. Once deleted the
    /// token cannot be used with
    /// [`DmApi::get_unmanaged_project_file_with_token`] again.
    pub async fn delete_instance_token(
        &self,
        instance_id: &str,
        callback_token: &str,
    ) -> Result<Value> {
        require(instance_id, "instance_id")?;
        require(callback_token, "callback_token")?;

        let request = ApiRequest::delete(
            format!("/instance/{}/token/{}", instance_id, callback_token),
            "Failed to delete instance token",
        );
        Ok(self.send(request).await?.json_or_empty())
    }

    /// Information about a Task, including its events.
    ///
    /// `event_prior_ordinal` and `event_limit` are only sent when non-zero.
    pub async fn get_task(
        &self,
        access_token: &str,
        task_id: &str,
        event_prior_ordinal: u64,
        event_limit: u64,
    ) -> Result<Value> {
        require(access_token, "access_token")?;
        require(task_id, "task_id")?;

        let mut request = ApiRequest::get(format!("/task/{}", task_id), "Failed to get task")
            .bearer(access_token);
        if event_prior_ordinal > 0 {
            request = request.query("event_prior_ordinal", event_prior_ordinal);
        }
        if event_limit > 0 {
            request = request.query("event_limit", event_limit);
        }
        Ok(self.send(request).await?.json_or_empty())
    }
}
