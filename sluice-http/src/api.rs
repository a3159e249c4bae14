//! The two repository operations a migration source needs

use crate::errors::HttpError;
use crate::types::{ApiResponse, FileBlob, GetFileBlobsRequest, ListRepositoryTreeRequest, TreeEntry};

/// Remote repository API
///
/// `Err` means the call could not complete. A call that completed but was
/// refused by the service comes back as `Ok` with `success == false`.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait RepositoryApi: Send + Sync {
    fn list_repository_tree(
        &self,
        project_id: &str,
        request: &ListRepositoryTreeRequest,
    ) -> Result<ApiResponse<Vec<TreeEntry>>, HttpError>;

    fn get_file_blobs(
        &self,
        project_id: &str,
        request: &GetFileBlobsRequest,
    ) -> Result<ApiResponse<FileBlob>, HttpError>;
}
