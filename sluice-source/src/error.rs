use sluice_config::ConfigError;
use sluice_http::HttpError;
use thiserror::Error;

use crate::parser::ParseError;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The remote call could not complete
    #[error(transparent)]
    Transport(#[from] HttpError),

    /// The remote call completed but the service reported a failure
    #[error("{0}")]
    RemoteDenied(String),

    #[error("{op} {path}: file does not exist")]
    NotFound { op: String, path: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown source driver: {0}")]
    UnknownDriver(String),

    #[error("Source driver already registered: {0}")]
    DuplicateDriver(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    pub fn not_found(op: impl Into<String>, path: impl Into<String>) -> Self {
        SourceError::NotFound {
            op: op.into(),
            path: path.into(),
        }
    }

    /// True when the requested migration or neighbour does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
