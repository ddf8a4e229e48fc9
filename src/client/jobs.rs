//! Job definitions and the Job operator

use super::{DmApi, request::ApiRequest, require};
use crate::{Error, Result, types::ApplicationInfo};
use serde_json::Value;
use tracing::{error, warn};

/// A test Account Server Product ID. It does not exist but is accepted by
/// the Data Manager for administrative users, for testing.
pub const TEST_PRODUCT_ID: &str = "product-11111111-1111-1111-1111-111111111111";

/// The well-known application ID of the Job operator
pub const DM_JOB_APPLICATION_ID: &str = "datamanagerjobs.squonk.it";

impl DmApi {
    /// A summary list of the available Jobs
    pub async fn get_available_jobs(&self, access_token: &str) -> Result<Value> {
        require(access_token, "access_token")?;

        let request = ApiRequest::get("/job", "Failed to get available jobs").bearer(access_token);
        Ok(self.send(request).await?.json_or_empty())
    }

    /// Detailed information about a Job, by its numeric record identity
    pub async fn get_job(&self, access_token: &str, job_id: u64) -> Result<Value> {
        require(access_token, "access_token")?;
        if job_id == 0 {
            return Err(Error::invalid_argument("job_id must be greater than zero"));
        }

        let request =
            ApiRequest::get(format!("/job/{}", job_id), "Failed to get job").bearer(access_token);
        Ok(self.send(request).await?.json_or_empty())
    }

    /// Detailed information about a Job, by collection, name and version
    pub async fn get_job_by_name(
        &self,
        access_token: &str,
        job_collection: &str,
        job_name: &str,
        job_version: &str,
    ) -> Result<Value> {
        require(access_token, "access_token")?;
        require(job_collection, "job_collection")?;
        require(job_name, "job_name")?;
        require(job_version, "job_version")?;

        let request = ApiRequest::get("/job/get-by-name", "Failed to get job")
            .bearer(access_token)
            .query("collection", job_collection)
            .query("name", job_name)
            .query("version", job_version);
        Ok(self.send(request).await?.json_or_empty())
    }

    /// The latest installed version of the Job operator.
    ///
    /// Without an operator the Data Manager cannot run Jobs.
    pub(crate) async fn latest_job_operator_version(&self, access_token: &str) -> Result<String> {
        let request = ApiRequest::get(
            format!("/application/{}", DM_JOB_APPLICATION_ID),
            "Failed getting Job application info",
        )
        .bearer(access_token);

        let response = match self.send(request).await {
            Ok(response) => response,
            Err(Error::NoApiUrl) => return Err(Error::NoApiUrl),
            Err(e) => {
                error!("Failed getting Job application info [{}]", e);
                return Err(Error::job_operator("Failed getting Job operator version"));
            }
        };

        let info: ApplicationInfo = serde_json::from_value(response.json_or_empty())?;
        match info.versions.into_iter().next() {
            Some(version) => Ok(version),
            None => {
                warn!("No versions returned for Job application info - no operator?");
                Err(Error::job_operator("No Job operator installed"))
            }
        }
    }
}
