//! Console Client - HTTP client for the admin backend
//!
//! Request plumbing, session storage and the session guard used by the
//! admin console, plus typed helpers for the backend's auth, resource and
//! export endpoints.

pub mod auth;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod guard;
pub mod http;
pub mod optimistic;
pub mod query;
pub mod resources;
pub mod session;

pub use auth::LoginOutcome;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ConfigError, StorageError};
pub use export::{ExportedFile, filename_from_disposition};
pub use extract::{EXTRACTION_STRATEGIES, Extraction, extract_collection};
pub use guard::{GuardHandle, GuardOutcome, GuardState, IdentityProvider, SessionGuard};
pub use http::{Body, HttpClient, RequestDescriptor, RequestOptions};
pub use optimistic::Optimistic;
pub use query::{Query, QueryValue};
pub use resources::Page;
pub use session::{CredentialStore, FileCredentialStore, MemoryCredentialStore, SessionContext};

// Re-export shared types for convenience
pub use shared::client::Identity;
pub use shared::error::{ApiError, ErrorCode};
pub use shared::{Resource, Role};
