//! Client configuration

use crate::error::ConfigError;
use crate::http::HttpClient;
use crate::session::{FileCredentialStore, SessionContext};
use std::path::PathBuf;

/// Base URL used when `ADMIN_API_BASE_URL` is unset or empty
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Directory used for the file credential store when `ADMIN_TOKEN_DIR` is unset
pub const DEFAULT_TOKEN_DIR: &str = ".admin-console";

/// Client configuration for connecting to the backend API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "https://shop.example.com/api")
    pub base_url: String,

    /// Request timeout in seconds; `None` leaves the transport default
    pub timeout: Option<u64>,

    /// Directory holding the persisted credential
    pub token_dir: PathBuf,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            token_dir: PathBuf::from(DEFAULT_TOKEN_DIR),
        }
    }

    /// Load configuration from environment variables
    ///
    /// - `ADMIN_API_BASE_URL` (fallback [`DEFAULT_BASE_URL`])
    /// - `ADMIN_API_TIMEOUT_SECS` (optional)
    /// - `ADMIN_TOKEN_DIR` (fallback [`DEFAULT_TOKEN_DIR`])
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("ADMIN_API_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());

        let timeout = match std::env::var("ADMIN_API_TIMEOUT_SECS") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?,
            ),
            _ => None,
        };

        let token_dir = std::env::var("ADMIN_TOKEN_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOKEN_DIR));

        Ok(Self {
            base_url,
            timeout,
            token_dir,
        })
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Set the credential directory
    pub fn with_token_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.token_dir = dir.into();
        self
    }

    /// Session backed by a credential file under [`ClientConfig::token_dir`]
    pub fn file_session(&self) -> SessionContext {
        SessionContext::new(FileCredentialStore::new(&self.token_dir))
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self, session: SessionContext) -> Result<HttpClient, ConfigError> {
        HttpClient::new(self, session)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
