//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Short code generation
//! - [`bearer`] - Optional bearer token extraction from request headers
//! - [`url_normalizer`] - URL canonicalization before storage

pub mod bearer;
pub mod code_generator;
pub mod url_normalizer;
