//! Business logic services for the application layer.

pub mod identity_service;
pub mod link_service;

pub use identity_service::{TokenIdentityResolver, hash_token};
pub use link_service::{LinkService, ListingPolicy};
