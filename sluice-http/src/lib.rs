//! Codeup repository API access for sluice
//!
//! This crate provides the [`RepositoryApi`] seam used by migration sources,
//! a blocking HTTPS implementation of it, and an in-memory repository for
//! running sources offline.

pub mod api;
pub mod client;
pub mod errors;
pub mod fixture;
pub mod types;

// Re-export main types for convenience
pub use api::RepositoryApi;
#[cfg(any(test, feature = "testing"))]
pub use api::MockRepositoryApi;
pub use client::HttpRepositoryClient;
pub use errors::HttpError;
pub use fixture::{RecordedRequest, StaticRepository};
pub use types::{
    ApiResponse, EntryType, FileBlob, GetFileBlobsRequest, ListRepositoryTreeRequest, TreeEntry,
};
