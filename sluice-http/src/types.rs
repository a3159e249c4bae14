//! Request and response types of the Codeup repository API

use serde::{Deserialize, Serialize};

/// Query parameters of the "list repository tree" call
///
/// Absent fields are left out of the query string entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRepositoryTreeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(rename = "refName", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    /// `DIRECT`, `RECURSIVE` or `FLATTEN`; the service lists direct children when unset
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub tree_type: Option<String>,
}

/// Query parameters of the "get file blobs" call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFileBlobsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
}

/// Envelope every API response is wrapped in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(result: T) -> Self {
        Self {
            success: true,
            error_code: None,
            error_message: None,
            request_id: None,
            result: Some(result),
        }
    }

    pub fn denied(error_code: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_code: Some(error_code.into()),
            error_message: Some(error_message.into()),
            request_id: None,
            result: None,
        }
    }
}

/// Kind of a repository tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Blob,
    Tree,
    Commit,
}

/// One entry of a repository tree listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(rename = "isLFS", default, skip_serializing_if = "Option::is_none")]
    pub is_lfs: Option<bool>,
}

impl TreeEntry {
    pub fn blob(name: impl Into<String>) -> Self {
        Self::new(name, EntryType::Blob)
    }

    pub fn tree(name: impl Into<String>) -> Self {
        Self::new(name, EntryType::Tree)
    }

    fn new(name: impl Into<String>, entry_type: EntryType) -> Self {
        Self {
            id: None,
            name: name.into(),
            path: None,
            entry_type,
            mode: None,
            is_lfs: None,
        }
    }

    pub fn is_blob(&self) -> bool {
        self.entry_type == EntryType::Blob
    }
}

/// File content returned by "get file blobs"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileBlob {
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}
