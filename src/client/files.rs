//! Unmanaged project file operations
//!
//! Files are addressed by a project path (relative to the project root,
//! beginning `/`) and a file name. Leading local directories are stripped on
//! upload, so `dir/file-a.txt` and `file-b.txt` land side by side.

use super::{
    DmApi,
    request::{ApiRequest, empty_object},
    require, require_project_path,
};
use crate::{Error, Result, types::ProjectFileList};
use reqwest::{
    StatusCode,
    multipart::{Form, Part},
};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

impl DmApi {
    /// Put local files into a Project directory.
    ///
    /// Unless `force` is set, files whose names already exist on
    /// `project_path` are skipped rather than over-written. Every source must
    /// be an existing local file, whether it is sent or not. Files are sent
    /// one at a time and the first failure stops the upload.
    pub async fn put_unmanaged_project_files<P: AsRef<Path>>(
        &self,
        access_token: &str,
        project_id: &str,
        project_files: &[P],
        project_path: &str,
        force: bool,
    ) -> Result<Value> {
        require(access_token, "access_token")?;
        require(project_id, "project_id")?;
        if project_files.is_empty() {
            return Err(Error::invalid_argument("No project files given"));
        }
        require_project_path(project_path)?;
        self.require_api_url()?;

        let existing = if force {
            warn!(
                "Putting files (force=true project_id={} path={})",
                project_id, project_path
            );
            ProjectFileList::default()
        } else {
            self.existing_project_files(access_token, project_id, project_path)
                .await?
        };

        for src_file in project_files {
            let src_file = src_file.as_ref();
            let is_file = tokio::fs::metadata(src_file)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);
            if !is_file {
                return Err(Error::NoSuchFile(src_file.to_path_buf()));
            }

            let file_name = base_name(src_file)?;
            if existing.contains(&file_name) {
                debug!("Skipping {} - already in {}", file_name, project_path);
                continue;
            }

            self.put_unmanaged_project_file(
                access_token,
                project_id,
                src_file,
                &file_name,
                project_path,
            )
            .await?;
        }

        Ok(empty_object())
    }

    /// Delete files from a Project directory, stopping at the first failure
    pub async fn delete_unmanaged_project_files<S: AsRef<str>>(
        &self,
        access_token: &str,
        project_id: &str,
        project_files: &[S],
        project_path: &str,
    ) -> Result<Value> {
        require(access_token, "access_token")?;
        require(project_id, "project_id")?;
        require_project_path(project_path)?;

        for file in project_files {
            let request = ApiRequest::delete("/file", "Failed to delete project file")
                .bearer(access_token)
                .expect(&[StatusCode::NO_CONTENT])
                .query("project_id", project_id)
                .query("path", project_path)
                .query("file", file.as_ref());
            self.send(request).await?;
        }

        Ok(empty_object())
    }

    /// List the files on a Project path
    pub async fn list_project_files(
        &self,
        access_token: &str,
        project_id: &str,
        project_path: &str,
        include_hidden: bool,
    ) -> Result<Value> {
        require(access_token, "access_token")?;
        require(project_id, "project_id")?;
        require_project_path(project_path)?;

        let request = ApiRequest::get("/file", "Failed to list project files")
            .bearer(access_token)
            .query("project_id", project_id)
            .query("path", project_path)
            .query("include_hidden", include_hidden)
            .timeout(self.timeouts.file_list());
        Ok(self.send(request).await?.json_or_empty())
    }

    /// Get a single file from a Project path, writing it to `local_file`
    pub async fn get_unmanaged_project_file(
        &self,
        access_token: &str,
        project_id: &str,
        project_file: &str,
        local_file: impl AsRef<Path>,
        project_path: &str,
    ) -> Result<Value> {
        require(access_token, "access_token")?;
        require(project_id, "project_id")?;
        require(project_file, "project_file")?;
        require_project_path(project_path)?;

        let request = ApiRequest::get(format!("/project/{}/file", project_id), "Failed to get file")
            .bearer(access_token)
            .query("path", project_path)
            .query("file", project_file)
            .timeout(self.timeouts.file_list());
        self.download(request, local_file.as_ref()).await
    }

    /// Like [`DmApi::get_unmanaged_project_file`] but authorised by an
    /// Instance callback token rather than a user access token.
    ///
    /// Useful in callback handlers where no access token is available.
    /// Callback tokens expire and can be deleted.
    pub async fn get_unmanaged_project_file_with_token(
        &self,
        callback_token: &str,
        project_id: &str,
        project_file: &str,
        local_file: impl AsRef<Path>,
        project_path: &str,
    ) -> Result<Value> {
        require(callback_token, "callback_token")?;
        require(project_id, "project_id")?;
        require(project_file, "project_file")?;
        require_project_path(project_path)?;

        let request = ApiRequest::get(
            format!("/project/{}/file-with-token", project_id),
            "Failed to get file",
        )
        .query("path", project_path)
        .query("file", project_file)
        .query("token", callback_token)
        .timeout(self.timeouts.file_list());
        self.download(request, local_file.as_ref()).await
    }

    /// Names of the files already on a project path (none if the path is absent)
    async fn existing_project_files(
        &self,
        access_token: &str,
        project_id: &str,
        project_path: &str,
    ) -> Result<ProjectFileList> {
        let request = ApiRequest::get("/file", "Failed getting existing project files")
            .bearer(access_token)
            .expect(&[StatusCode::OK, StatusCode::NOT_FOUND])
            .query("project_id", project_id)
            .query("path", project_path);
        let response = self.send(request).await?;

        if response.status == StatusCode::NOT_FOUND {
            return Ok(ProjectFileList::default());
        }
        response.parse()
    }

    async fn put_unmanaged_project_file(
        &self,
        access_token: &str,
        project_id: &str,
        src_file: &Path,
        file_name: &str,
        project_path: &str,
    ) -> Result<()> {
        let content = tokio::fs::read(src_file).await?;
        let form = Form::new()
            .text("path", project_path.to_string())
            .part("file", Part::bytes(content).file_name(file_name.to_string()));

        let request = ApiRequest::put(
            format!("/project/{}/file", project_id),
            format!("Failed putting file {}/{}", project_path, file_name),
        )
        .bearer(access_token)
        .expect(&[StatusCode::CREATED])
        .multipart(form)
        .timeout(self.timeouts.file_upload());

        if let Err(e) = self.send(request).await {
            warn!(
                "Failed putting file {} -> {} (project_id={}): {}",
                src_file.display(),
                project_path,
                project_id,
                e
            );
            return Err(e);
        }
        debug!("Put {} into {}", file_name, project_path);
        Ok(())
    }

    async fn download(&self, request: ApiRequest<'_>, local_file: &Path) -> Result<Value> {
        let response = self.send(request).await?;
        tokio::fs::write(local_file, &response.body).await?;
        debug!(
            "Wrote {} bytes to {}",
            response.body.len(),
            local_file.display()
        );
        Ok(empty_object())
    }
}

/// The file name part of a local path
fn base_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| Error::invalid_argument(format!("No file name in {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name_strips_directories() {
        assert_eq!(base_name(Path::new("dir/file-a.txt")).unwrap(), "file-a.txt");
        assert_eq!(base_name(Path::new("file-b.txt")).unwrap(), "file-b.txt");
        assert!(base_name(Path::new("/")).is_err());
    }
}
