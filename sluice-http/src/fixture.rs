//! In-memory repository for running sources without network access

use crate::api::RepositoryApi;
use crate::errors::HttpError;
use crate::types::{ApiResponse, FileBlob, GetFileBlobsRequest, ListRepositoryTreeRequest, TreeEntry};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;
use tracing::debug;

/// A call observed by [`StaticRepository`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    Tree {
        project_id: String,
        path: Option<String>,
    },
    Blob {
        project_id: String,
        file_path: Option<String>,
        git_ref: Option<String>,
    },
}

/// Repository snapshot held in memory
///
/// Paths are compared without leading or trailing slashes, so `/db` and
/// `db/` name the same directory.
#[derive(Debug, Default)]
pub struct StaticRepository {
    files: BTreeMap<String, String>,
    directories: BTreeSet<String>,
    tree_denied: Option<String>,
    tree_unreachable: Option<String>,
    blob_denied: HashMap<String, String>,
    blob_unreachable: HashMap<String, String>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StaticRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file; its parent directories are created implicitly
    pub fn with_file(mut self, path: &str, content: impl Into<String>) -> Self {
        self.files.insert(normalize(path), content.into());
        self
    }

    /// Add an empty directory
    pub fn with_directory(mut self, path: &str) -> Self {
        self.directories.insert(normalize(path));
        self
    }

    /// Refuse every tree listing with `message`
    pub fn with_tree_denied(mut self, message: impl Into<String>) -> Self {
        self.tree_denied = Some(message.into());
        self
    }

    /// Fail every tree listing before it reaches the service
    pub fn with_tree_unreachable(mut self, message: impl Into<String>) -> Self {
        self.tree_unreachable = Some(message.into());
        self
    }

    /// Refuse reads of `path` with `message`
    pub fn with_blob_denied(mut self, path: &str, message: impl Into<String>) -> Self {
        self.blob_denied.insert(normalize(path), message.into());
        self
    }

    /// Fail reads of `path` before they reach the service
    pub fn with_blob_unreachable(mut self, path: &str, message: impl Into<String>) -> Self {
        self.blob_unreachable.insert(normalize(path), message.into());
        self
    }

    /// Every call made so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record(&self, request: RecordedRequest) {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);
    }

    fn children(&self, directory: &str) -> Vec<TreeEntry> {
        let mut blobs = BTreeSet::new();
        let mut trees = BTreeSet::new();

        let paths = self
            .files
            .keys()
            .map(|p| (p, true))
            .chain(self.directories.iter().map(|p| (p, false)));

        for (path, is_file) in paths {
            let Some(rest) = strip_directory(path, directory) else {
                continue;
            };
            match rest.split_once('/') {
                Some((subdirectory, _)) => {
                    trees.insert(subdirectory.to_string());
                }
                None if is_file => {
                    blobs.insert(rest.to_string());
                }
                None => {
                    trees.insert(rest.to_string());
                }
            }
        }

        let join = |name: &str| {
            if directory.is_empty() {
                name.to_string()
            } else {
                format!("{}/{}", directory, name)
            }
        };

        trees
            .iter()
            .map(|name| TreeEntry {
                path: Some(join(name)),
                ..TreeEntry::tree(name.as_str())
            })
            .chain(blobs.iter().map(|name| TreeEntry {
                path: Some(join(name)),
                ..TreeEntry::blob(name.as_str())
            }))
            .collect()
    }
}

impl RepositoryApi for StaticRepository {
    fn list_repository_tree(
        &self,
        project_id: &str,
        request: &ListRepositoryTreeRequest,
    ) -> Result<ApiResponse<Vec<TreeEntry>>, HttpError> {
        self.record(RecordedRequest::Tree {
            project_id: project_id.to_string(),
            path: request.path.clone(),
        });

        if let Some(message) = &self.tree_unreachable {
            return Err(HttpError::Unreachable(message.clone()));
        }
        if let Some(message) = &self.tree_denied {
            return Ok(ApiResponse::denied("Forbidden", message.as_str()));
        }

        let directory = normalize(request.path.as_deref().unwrap_or_default());
        let entries = self.children(&directory);
        debug!("Static tree listing of '{}': {} entries", directory, entries.len());

        Ok(ApiResponse::ok(entries))
    }

    fn get_file_blobs(
        &self,
        project_id: &str,
        request: &GetFileBlobsRequest,
    ) -> Result<ApiResponse<FileBlob>, HttpError> {
        self.record(RecordedRequest::Blob {
            project_id: project_id.to_string(),
            file_path: request.file_path.clone(),
            git_ref: request.git_ref.clone(),
        });

        let path = normalize(request.file_path.as_deref().unwrap_or_default());

        if let Some(message) = self.blob_unreachable.get(&path) {
            return Err(HttpError::Unreachable(message.clone()));
        }
        if let Some(message) = self.blob_denied.get(&path) {
            return Ok(ApiResponse::denied("Forbidden", message.as_str()));
        }

        match self.files.get(&path) {
            Some(content) => Ok(ApiResponse::ok(FileBlob {
                content: content.clone(),
                file_name: path.rsplit('/').next().map(str::to_string),
                file_path: Some(path.clone()),
            })),
            None => Ok(ApiResponse::denied(
                "NotFound",
                format!("file {} not found", path),
            )),
        }
    }
}

fn normalize(path: &str) -> String {
    path.trim_matches('/').to_string()
}

fn strip_directory<'a>(path: &'a str, directory: &str) -> Option<&'a str> {
    if directory.is_empty() {
        return Some(path);
    }
    path.strip_prefix(directory)?.strip_prefix('/')
}
