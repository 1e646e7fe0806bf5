//! Domain layer containing business entities and contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures and the link lifecycle
//! - [`repositories`] - Data access trait definitions
//! - [`identity`] - Credential to owner resolution contract
//!
//! The domain layer has no dependencies on infrastructure or presentation layers.
//! Business logic lives in [`crate::application::services`].

pub mod entities;
pub mod identity;
pub mod repositories;

pub use identity::IdentityResolver;

#[cfg(test)]
pub use identity::MockIdentityResolver;
