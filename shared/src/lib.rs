//! Shared types for the admin console
//!
//! Wire DTOs, the error-code taxonomy with its friendly-message table,
//! the normalized error shape, and resource descriptors. No I/O lives here.

pub mod client;
pub mod error;
pub mod models;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiError, ErrorCategory, ErrorCode};
pub use models::{Resource, Role};
