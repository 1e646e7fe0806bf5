//! Application layer services implementing business logic.
//!
//! Services consume the domain contracts through `Arc<dyn Trait>` handles supplied at
//! construction, so every collaborator can be swapped for a mock or an in-memory store.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link lifecycle
//! - [`services::identity_service::TokenIdentityResolver`] - Bearer token to owner resolution

pub mod services;
