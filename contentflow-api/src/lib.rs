//! # ContentFlow API Server Library
//!
//! Library crate for the ContentFlow API server. Exposes the application
//! builder, configuration, routes, and error types so integration tests can
//! construct the full router against an in-memory store.

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
