//! HTTP middleware for request processing.
//!
//! Provides bearer authentication and request tracing.

pub mod auth;
pub mod tracing;

pub use auth::CurrentOwner;
