//! HTTP error types

/// Error type for calls that could not complete at the client layer
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header value for {0}")]
    InvalidHeaderValue(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response carried no result: {0}")]
    MissingResult(String),

    #[error("Remote unreachable: {0}")]
    Unreachable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
