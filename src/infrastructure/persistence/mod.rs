//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with bound
//! parameters for SQL injection protection.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage and retrieval
//! - [`PgOwnerRepository`] - Owners and API token storage

pub mod pg_link_repository;
pub mod pg_owner_repository;

pub use pg_link_repository::PgLinkRepository;
pub use pg_owner_repository::PgOwnerRepository;
