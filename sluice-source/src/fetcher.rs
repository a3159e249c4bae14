//! Remote file access bound to one repository coordinate

use sluice_config::CodeupConfig;
use sluice_http::{ApiResponse, GetFileBlobsRequest, HttpError, ListRepositoryTreeRequest, RepositoryApi};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{Result, SourceError};

/// Lists and reads migration files through a [`RepositoryApi`]
///
/// Every call is a single round trip; nothing is cached or retried.
#[derive(Clone)]
pub struct RemoteFetcher {
    api: Arc<dyn RepositoryApi>,
    config: CodeupConfig,
}

impl RemoteFetcher {
    pub fn new(api: Arc<dyn RepositoryApi>, config: CodeupConfig) -> Self {
        Self { api, config }
    }

    pub fn config(&self) -> &CodeupConfig {
        &self.config
    }

    /// Names of the files directly under the configured path
    ///
    /// Sub-directories are not migrations and are left out.
    pub fn list_tree(&self) -> Result<Vec<String>> {
        let request = ListRepositoryTreeRequest {
            organization_id: Some(self.config.organization_id.clone()),
            access_token: Some(self.config.access_token.clone()),
            path: Some(self.config.path.clone()),
            git_ref: Some(self.config.git_ref.clone()),
            tree_type: None,
        };

        let response = self
            .api
            .list_repository_tree(&self.config.project_id, &request)?;
        let entries = accepted(response)?.unwrap_or_default();

        let mut names = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.is_blob() {
                names.push(entry.name);
            } else {
                debug!("Skipping non-file entry {} in {}", entry.name, self.config.path);
            }
        }

        info!(
            "Listed {} files under {} at {}",
            names.len(),
            self.config.path,
            self.config.git_ref
        );
        Ok(names)
    }

    /// Content of the file at `file_path`, exactly as stored
    pub fn read_file(&self, file_path: &str) -> Result<String> {
        let request = GetFileBlobsRequest {
            organization_id: Some(self.config.organization_id.clone()),
            access_token: Some(self.config.access_token.clone()),
            file_path: Some(file_path.to_string()),
            git_ref: Some(self.config.git_ref.clone()),
        };

        let response = self.api.get_file_blobs(&self.config.project_id, &request)?;
        let blob = accepted(response)?
            .ok_or_else(|| HttpError::MissingResult(file_path.to_string()))?;

        debug!("Read {} bytes from {}", blob.content.len(), file_path);
        Ok(blob.content)
    }
}

fn accepted<T>(response: ApiResponse<T>) -> Result<Option<T>> {
    if !response.success {
        return Err(SourceError::RemoteDenied(
            response.error_message.unwrap_or_default(),
        ));
    }
    Ok(response.result)
}
