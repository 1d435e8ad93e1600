//! Data models
//!
//! Per-resource payloads are owned by the backend and passed through as
//! `serde_json::Value`; these models describe only what the console itself
//! reasons about.

pub mod resource;
pub mod role;

// Re-exports
pub use resource::Resource;
pub use role::Role;
