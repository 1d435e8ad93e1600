//! Friendly-message resolution
//!
//! Turns a backend error code or message into a sentence that is safe to
//! show an operator. Pure: no I/O, no logging, never panics.

use super::codes::ErrorCode;
use serde_json::Value;

/// Sentence used when nothing more specific is safe to show
pub const GENERIC_MESSAGE: &str = "Something went wrong on our side. Please try again.";

/// Substrings that betray storage-engine or driver internals
///
/// Matched case-insensitively against the raw message.
const LEAK_MARKERS: &[&str] = &[
    "mongo",
    "e11000",
    "prisma",
    "sequelize",
    "sql",
    "postgres",
    "redis",
    "duplicate key",
    "objectid",
    "econnrefused",
];

/// Resolve the friendly message for an error.
///
/// Lookup order:
/// 1. `code`, then `response.code`, against the [`ErrorCode`] table
/// 2. `message`, then `response.message`, if it carries no leak marker
/// 3. [`GENERIC_MESSAGE`]
pub fn resolve(code: Option<&str>, message: Option<&str>, response: Option<&Value>) -> String {
    let response_code = response.and_then(|r| r.get("code")).and_then(Value::as_str);

    if let Some(known) = [code, response_code]
        .into_iter()
        .flatten()
        .find_map(|c| ErrorCode::try_from(c).ok())
    {
        return known.friendly_message().to_string();
    }

    let response_message = response
        .and_then(|r| r.get("message"))
        .and_then(Value::as_str);

    [message, response_message]
        .into_iter()
        .flatten()
        .find(|m| !m.trim().is_empty())
        .filter(|m| is_safe(m))
        .map(str::to_string)
        .unwrap_or_else(|| GENERIC_MESSAGE.to_string())
}

/// Whether a raw message can be shown without leaking backend internals
pub fn is_safe(message: &str) -> bool {
    let lower = message.to_lowercase();
    !LEAK_MARKERS.iter().any(|marker| lower.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mapped_code_beats_message() {
        for code in ErrorCode::ALL {
            let msg = resolve(Some(code.as_str()), Some("raw backend text"), None);
            assert_eq!(msg, code.friendly_message());
        }
    }

    #[test]
    fn test_response_code_used_when_error_code_unknown() {
        let body = json!({ "code": "DUPLICATE_SLUG", "message": "slug taken" });
        let msg = resolve(Some("HTTP_ERROR"), Some("slug taken"), Some(&body));
        assert_eq!(msg, ErrorCode::DuplicateSlug.friendly_message());
    }

    #[test]
    fn test_unmapped_code_with_safe_message() {
        let msg = resolve(Some("HTTP_ERROR"), Some("Banner title is too long"), None);
        assert_eq!(msg, "Banner title is too long");
    }

    #[test]
    fn test_response_message_used_when_message_missing() {
        let body = json!({ "message": "Course is archived" });
        assert_eq!(resolve(None, None, Some(&body)), "Course is archived");
        assert_eq!(resolve(None, Some("   "), Some(&body)), "Course is archived");
    }

    #[test]
    fn test_safe_message_returned_verbatim() {
        let msg = resolve(Some("HTTP_ERROR"), Some(" Name is required "), None);
        assert_eq!(msg, " Name is required ");

        let body = json!({ "message": "Line one\nLine two" });
        assert_eq!(resolve(None, Some("\t"), Some(&body)), "Line one\nLine two");
    }

    #[test]
    fn test_leaky_message_replaced() {
        let leaky = [
            "E11000 duplicate key error collection: shop.products",
            "MongoServerError: bad auth",
            "PrismaClientKnownRequestError",
            "SQLSTATE[23000]",
            "connect ECONNREFUSED 127.0.0.1:6379",
            "Cast to ObjectId failed",
        ];
        for m in leaky {
            assert_eq!(resolve(Some("HTTP_ERROR"), Some(m), None), GENERIC_MESSAGE, "{m}");
        }
    }

    #[test]
    fn test_nothing_usable() {
        assert_eq!(resolve(None, None, None), GENERIC_MESSAGE);
        assert_eq!(resolve(Some("SOMETHING_NEW"), Some(""), None), GENERIC_MESSAGE);
        assert_eq!(resolve(None, None, Some(&json!("plain text body"))), GENERIC_MESSAGE);
    }

    #[test]
    fn test_numeric_response_code_is_ignored() {
        let body = json!({ "code": 404 });
        assert_eq!(resolve(None, Some("Gone"), Some(&body)), "Gone");
    }
}
