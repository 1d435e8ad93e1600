//! Error codes understood by the admin console
//!
//! The backend reports failures with SCREAMING_SNAKE_CASE string codes.
//! Codes are grouped by category:
//! - Auth: credentials, one-time codes, sessions, roles
//! - Resource: lookups, unique keys, stock
//! - Upload: file transfer and file type
//! - General: validation, rate limiting, transport, unclassified failures

use super::category::ErrorCategory;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Known error codes with a curated user-facing sentence
///
/// Codes outside this enum are still carried verbatim on
/// [`ApiError::code`](super::ApiError::code); they simply have no
/// curated sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ==================== Auth ====================
    /// Email/password pair rejected
    InvalidCredentials,
    /// One-time code does not match
    InvalidOtp,
    /// One-time code is past its lifetime
    OtpExpired,
    /// Too many one-time code attempts
    OtpRateLimited,
    /// Account blocked by an administrator
    AccountBlocked,
    /// Credential no longer accepted
    SessionExpired,
    /// No credential supplied
    Unauthorized,
    /// Credential valid but action not allowed
    Forbidden,
    /// Action requires the administrator role
    AdminRequired,

    // ==================== Resource ====================
    ProductNotFound,
    CategoryNotFound,
    OrderNotFound,
    /// Unique slug already taken
    DuplicateSlug,
    OutOfStock,

    // ==================== Upload ====================
    UploadFailed,
    UnsupportedFileType,

    // ==================== General ====================
    /// Request body failed validation
    ValidationError,
    /// Too many requests (HTTP 429)
    RateLimited,
    /// Backend unreachable (DNS, refused connection, offline)
    NetworkError,
    /// Unclassified server error
    InternalError,
    /// Successful status but the payload is missing what the caller needs
    InvalidResponse,
}

impl ErrorCode {
    /// Every code in the table, in declaration order
    pub const ALL: [ErrorCode; 21] = [
        ErrorCode::InvalidCredentials,
        ErrorCode::InvalidOtp,
        ErrorCode::OtpExpired,
        ErrorCode::OtpRateLimited,
        ErrorCode::AccountBlocked,
        ErrorCode::SessionExpired,
        ErrorCode::Unauthorized,
        ErrorCode::Forbidden,
        ErrorCode::AdminRequired,
        ErrorCode::ProductNotFound,
        ErrorCode::CategoryNotFound,
        ErrorCode::OrderNotFound,
        ErrorCode::DuplicateSlug,
        ErrorCode::OutOfStock,
        ErrorCode::UploadFailed,
        ErrorCode::UnsupportedFileType,
        ErrorCode::ValidationError,
        ErrorCode::RateLimited,
        ErrorCode::NetworkError,
        ErrorCode::InternalError,
        ErrorCode::InvalidResponse,
    ];

    /// Wire representation of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::InvalidOtp => "INVALID_OTP",
            ErrorCode::OtpExpired => "OTP_EXPIRED",
            ErrorCode::OtpRateLimited => "OTP_RATE_LIMITED",
            ErrorCode::AccountBlocked => "ACCOUNT_BLOCKED",
            ErrorCode::SessionExpired => "SESSION_EXPIRED",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::AdminRequired => "ADMIN_REQUIRED",
            ErrorCode::ProductNotFound => "PRODUCT_NOT_FOUND",
            ErrorCode::CategoryNotFound => "CATEGORY_NOT_FOUND",
            ErrorCode::OrderNotFound => "ORDER_NOT_FOUND",
            ErrorCode::DuplicateSlug => "DUPLICATE_SLUG",
            ErrorCode::OutOfStock => "OUT_OF_STOCK",
            ErrorCode::UploadFailed => "UPLOAD_FAILED",
            ErrorCode::UnsupportedFileType => "UNSUPPORTED_FILE_TYPE",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::InvalidResponse => "INVALID_RESPONSE",
        }
    }

    /// Curated sentence shown to the operator for this code
    pub fn friendly_message(&self) -> &'static str {
        match self {
            // Auth
            ErrorCode::InvalidCredentials => "The email or password you entered is incorrect.",
            ErrorCode::InvalidOtp => "The verification code is incorrect.",
            ErrorCode::OtpExpired => "The verification code has expired. Please request a new one.",
            ErrorCode::OtpRateLimited => {
                "Too many verification attempts. Please wait a moment and try again."
            }
            ErrorCode::AccountBlocked => "This account has been blocked. Contact an administrator.",
            ErrorCode::SessionExpired => "Your session has expired. Please sign in again.",
            ErrorCode::Unauthorized => "Please sign in to continue.",
            ErrorCode::Forbidden => "You do not have permission to perform this action.",
            ErrorCode::AdminRequired => "Administrator access is required.",

            // Resource
            ErrorCode::ProductNotFound => "The product could not be found.",
            ErrorCode::CategoryNotFound => "The category could not be found.",
            ErrorCode::OrderNotFound => "The order could not be found.",
            ErrorCode::DuplicateSlug => "That slug is already in use. Choose a different one.",
            ErrorCode::OutOfStock => "This product is out of stock.",

            // Upload
            ErrorCode::UploadFailed => "The file could not be uploaded. Please try again.",
            ErrorCode::UnsupportedFileType => "This file type is not supported.",

            // General
            ErrorCode::ValidationError => "Some fields are invalid. Please review the form.",
            ErrorCode::RateLimited => "Too many requests. Please slow down and try again shortly.",
            ErrorCode::NetworkError => "Unable to reach the server. Check your connection.",
            ErrorCode::InternalError => super::GENERIC_MESSAGE,
            ErrorCode::InvalidResponse => "The server returned an unexpected response.",
        }
    }

    /// Category this code belongs to
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorCode::InvalidCredentials
            | ErrorCode::InvalidOtp
            | ErrorCode::OtpExpired
            | ErrorCode::OtpRateLimited
            | ErrorCode::AccountBlocked
            | ErrorCode::SessionExpired
            | ErrorCode::Unauthorized
            | ErrorCode::Forbidden
            | ErrorCode::AdminRequired => ErrorCategory::Auth,

            ErrorCode::ProductNotFound
            | ErrorCode::CategoryNotFound
            | ErrorCode::OrderNotFound
            | ErrorCode::DuplicateSlug
            | ErrorCode::OutOfStock => ErrorCategory::Resource,

            ErrorCode::UploadFailed | ErrorCode::UnsupportedFileType => ErrorCategory::Upload,

            ErrorCode::ValidationError
            | ErrorCode::RateLimited
            | ErrorCode::NetworkError
            | ErrorCode::InternalError
            | ErrorCode::InvalidResponse => ErrorCategory::General,
        }
    }

    /// HTTP status the backend usually pairs with this code
    ///
    /// Informational only: the status on a normalized error is always the
    /// one actually received.
    pub fn http_status(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidCredentials
            | ErrorCode::InvalidOtp
            | ErrorCode::OtpExpired
            | ErrorCode::SessionExpired
            | ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,

            ErrorCode::AccountBlocked | ErrorCode::Forbidden | ErrorCode::AdminRequired => {
                StatusCode::FORBIDDEN
            }

            ErrorCode::ProductNotFound | ErrorCode::CategoryNotFound | ErrorCode::OrderNotFound => {
                StatusCode::NOT_FOUND
            }

            ErrorCode::DuplicateSlug | ErrorCode::OutOfStock => StatusCode::CONFLICT,

            ErrorCode::UnsupportedFileType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::OtpRateLimited | ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::NetworkError => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InvalidResponse => StatusCode::BAD_GATEWAY,
            ErrorCode::UploadFailed | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error when a string is not one of the known codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidErrorCode(pub String);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<&str> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ErrorCode::ALL
            .into_iter()
            .find(|code| code.as_str() == value)
            .ok_or_else(|| InvalidErrorCode(value.to_string()))
    }
}

impl std::str::FromStr for ErrorCode {
    type Err = InvalidErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::try_from(s)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
