//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access behind the Repository pattern. Concrete
//! implementations live in `crate::infrastructure`.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short link persistence (create, patch, lookups)
//! - [`OwnerRepository`] - Owners and their API tokens
//!
//! Mock implementations are generated via `mockall` for unit tests.

pub mod link_repository;
pub mod owner_repository;

pub use link_repository::LinkRepository;
pub use owner_repository::OwnerRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use owner_repository::MockOwnerRepository;
