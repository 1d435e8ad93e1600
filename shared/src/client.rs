//! Auth DTOs exchanged with the backend
//!
//! Request/response types for login, one-time-code verification and the
//! identity lookup used by the session guard.

use crate::models::Role;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// One-time code verification request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub code: String,
}

/// Request to send a fresh one-time code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResendOtpRequest {
    pub email: String,
}

/// Login / verification response
///
/// A response carrying `token` completes the login. A response with
/// `otp_required` and no token means a code was sent and must be verified.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub otp_required: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<Identity>,
}

/// The authenticated principal behind a credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawIdentity")]
pub struct Identity {
    pub id: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Identity {
    /// Whether this identity may open protected views
    pub fn is_privileged(&self) -> bool {
        self.role.is_admin()
    }
}

/// Identity as the backend sends it
///
/// Document stores answer with `_id`, `id`, or both; ids may be strings,
/// numbers or `{"$oid": ...}` objects.
#[derive(Deserialize)]
struct RawIdentity {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, rename = "_id")]
    object_id: Option<Value>,
    role: Role,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("$oid").and_then(id_string),
        _ => None,
    }
}

impl TryFrom<RawIdentity> for Identity {
    type Error = String;

    fn try_from(raw: RawIdentity) -> Result<Self, Self::Error> {
        let id = [raw.id.as_ref(), raw.object_id.as_ref()]
            .into_iter()
            .flatten()
            .find_map(id_string)
            .ok_or_else(|| "identity has no usable `id` or `_id`".to_string())?;
        Ok(Self {
            id,
            role: raw.role,
            email: raw.email,
            name: raw.name,
        })
    }
}
