//! Client error types

use shared::error::{ApiError, ErrorCode, NO_STATUS};
use thiserror::Error;

pub use shared::error::ApiError as ClientError;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ApiError>;

/// Credential storage failure
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("credential storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The credential contains characters that cannot go in a header
    #[error("credential is not a valid header value")]
    InvalidToken,
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::new(err.to_string(), NO_STATUS, ErrorCode::InternalError.as_str(), None)
    }
}

/// Client construction failure
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Base URL is not an absolute http(s) URL
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Timeout value could not be parsed
    #[error("invalid timeout '{0}': expected whole seconds")]
    InvalidTimeout(String),

    /// The underlying HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
