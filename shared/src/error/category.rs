//! Error category classification

use serde::{Deserialize, Serialize};

/// Broad grouping of error codes
///
/// Lets callers pick a presentation (inline field error, notification,
/// redirect) without matching on every individual code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Credentials, one-time codes, sessions and roles
    Auth,
    /// Lookups, unique keys and stock on catalog resources
    Resource,
    /// File transfer
    Upload,
    /// Validation, rate limiting, transport and unclassified failures
    General,
}

impl ErrorCategory {
    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Resource => "resource",
            Self::Upload => "upload",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
