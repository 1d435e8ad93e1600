//! Role Model

use serde::{Deserialize, Serialize};

/// Role names the console distinguishes
///
/// Only [`Role::Admin`] may open protected views. Any other role string
/// coming from the backend maps to [`Role::Other`] and keeps its spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Other(String),
}

impl Role {
    /// Role value that unlocks protected views
    pub const PRIVILEGED: &'static str = "admin";

    /// Case-insensitive check of a raw role string against the privileged role
    pub fn is_privileged(raw: &str) -> bool {
        raw.trim().eq_ignore_ascii_case(Self::PRIVILEGED)
    }

    /// Whether this role may open protected views
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => Self::PRIVILEGED,
            Role::Other(name) => name,
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        if Role::is_privileged(&raw) {
            Role::Admin
        } else {
            Role::Other(raw)
        }
    }
}

impl From<&str> for Role {
    fn from(raw: &str) -> Self {
        Role::from(raw.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => Role::PRIVILEGED.to_string(),
            Role::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
