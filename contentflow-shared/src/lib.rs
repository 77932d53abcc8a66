//! # ContentFlow Shared Library
//!
//! This crate contains the workflow core shared between the ContentFlow API
//! server and its tests: the identity/permission model, the content lifecycle
//! engine, the per-customer calendar aggregate, authentication utilities, and
//! the document-store collaborator contract.
//!
//! ## Module Organization
//!
//! - `models`: Domain entities (users, content, calendars, submissions)
//! - `auth`: Authentication and authorization utilities
//! - `store`: Document store trait and in-memory implementation

pub mod auth;
pub mod models;
pub mod store;

/// Current version of the ContentFlow shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
