//! In-process repository implementations.
//!
//! Used by the HTTP integration tests and by `STORAGE=memory` runs. Data does not
//! survive a restart.

mod memory_link_repository;
mod memory_owner_repository;

pub use memory_link_repository::MemoryLinkRepository;
pub use memory_owner_repository::MemoryOwnerRepository;
