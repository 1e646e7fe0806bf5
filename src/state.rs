//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::LinkService;
use crate::domain::IdentityResolver;
use crate::domain::repositories::LinkRepository;

/// Cheaply cloneable handle to the services behind the router.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub identity: Arc<dyn IdentityResolver>,
    /// Used directly only by the health check.
    pub link_repository: Arc<dyn LinkRepository>,
    /// Public origin prepended to codes, e.g. `https://s.example.com`.
    pub base_url: String,
}
