//! The normalized error shape

use super::codes::ErrorCode;
use super::friendly;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Code for a non-2xx response whose body names no code
pub const HTTP_ERROR: &str = "HTTP_ERROR";

/// Status recorded for failures that never produced an HTTP response
pub const NO_STATUS: u16 = 0;

/// Uniform failure produced for every failed backend call
///
/// - `message`: raw message (backend body or a method+path fallback)
/// - `status`: HTTP status, `0` when no response was received
/// - `code`: backend code, or one of `RATE_LIMITED` / `HTTP_ERROR` /
///   `NETWORK_ERROR` / `INVALID_RESPONSE`
/// - `friendly_message`: curated, operator-safe sentence
/// - `response`: parsed response body, if any
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub message: String,
    pub status: u16,
    pub code: String,
    pub friendly_message: String,
    pub response: Option<Value>,
}

impl ApiError {
    /// Build an error and annotate it with its friendly message
    pub fn new(
        message: impl Into<String>,
        status: u16,
        code: impl Into<String>,
        response: Option<Value>,
    ) -> Self {
        let mut err = Self {
            message: message.into(),
            status,
            code: code.into(),
            friendly_message: String::new(),
            response,
        };
        err.annotate();
        err
    }

    /// Error for a known code with its default sentence as the message
    pub fn from_code(code: ErrorCode, status: u16) -> Self {
        Self::new(code.friendly_message(), status, code.as_str(), None)
    }

    /// Transport-level failure: nothing came back from the backend
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(message, NO_STATUS, ErrorCode::NetworkError.as_str(), None)
    }

    /// A successful response lacked something the caller needs
    pub fn invalid_response(status: u16, message: impl Into<String>) -> Self {
        Self::new(message, status, ErrorCode::InvalidResponse.as_str(), None)
    }

    /// Build the error for a non-2xx response.
    ///
    /// `message` comes from the body's `message` (or `error`) string, else
    /// `fallback`. `code` comes from the body's `code` (string or number),
    /// else `RATE_LIMITED` for 429, else `HTTP_ERROR`.
    pub fn from_response(status: u16, body: Option<Value>, fallback: impl Into<String>) -> Self {
        let field = |name: &str| {
            body.as_ref()
                .and_then(|b| b.get(name))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let message = field("message")
            .or_else(|| field("error"))
            .unwrap_or_else(|| fallback.into());

        let code = match body.as_ref().and_then(|b| b.get("code")) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ if status == 429 => ErrorCode::RateLimited.as_str().to_string(),
            _ => HTTP_ERROR.to_string(),
        };

        Self::new(message, status, code, body)
    }

    /// Recompute `friendly_message` from the current fields
    pub fn annotate(&mut self) {
        self.friendly_message = friendly::resolve(
            Some(self.code.as_str()),
            Some(self.message.as_str()),
            self.response.as_ref(),
        );
    }

    /// The code as a known [`ErrorCode`], if it is one
    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::try_from(self.code.as_str()).ok()
    }

    /// Whether the failure never reached the backend
    pub fn is_network(&self) -> bool {
        self.status == NO_STATUS && self.code == ErrorCode::NetworkError.as_str()
    }

    /// Whether the backend rejected the credential
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

/// Type alias for Result with ApiError
pub type ApiResult<T> = Result<T, ApiError>;
