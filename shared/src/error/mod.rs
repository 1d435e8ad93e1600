//! Error system for the admin console
//!
//! - [`ErrorCode`]: known backend codes, each with a curated sentence
//! - [`ErrorCategory`]: auth / resource / upload / general grouping
//! - [`ApiError`]: the normalized error every failed call produces
//! - [`friendly_message`]: pure code-or-message to sentence resolution
//!
//! # Example
//!
//! ```
//! use shared::error::{ApiError, ErrorCode};
//! use serde_json::json;
//!
//! let err = ApiError::from_response(409, Some(json!({ "code": "DUPLICATE_SLUG" })), "fallback");
//! assert_eq!(err.error_code(), Some(ErrorCode::DuplicateSlug));
//! assert_eq!(err.friendly_message, "That slug is already in use. Choose a different one.");
//! ```

mod category;
mod codes;
mod friendly;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use friendly::{GENERIC_MESSAGE, is_safe as is_safe_message};
pub use types::{ApiError, ApiResult, HTTP_ERROR, NO_STATUS};

use serde_json::Value;

/// Friendly message for an arbitrary (code, message, response) triple
///
/// Same resolution as [`ApiError::friendly_message`]; usable on errors that
/// did not come through the request client.
pub fn friendly_message(code: Option<&str>, message: Option<&str>, response: Option<&Value>) -> String {
    friendly::resolve(code, message, response)
}
