//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Link`] - A shortened URL mapping with its access counter and lifecycle
//! - [`Owner`] - An authenticated user that owns links
//! - [`ApiToken`] - A hashed bearer credential belonging to an owner
//!
//! # Design Pattern
//!
//! Entities follow the "New Type" pattern with separate structs for creation:
//! - `NewLink`, `NewOwner` - For creating new records
//! - `LinkPatch` - For partial updates

pub mod link;
pub mod owner;

pub use link::{Lifecycle, Link, LinkPatch, NewLink};
pub use owner::{ApiToken, NewOwner, Owner};
