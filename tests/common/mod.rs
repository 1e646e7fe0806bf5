#![allow(dead_code)]

use axum_test::TestServer;
use shortlink::application::services::hash_token;
use shortlink::config::{Config, StorageKind};
use shortlink::domain::entities::NewOwner;
use shortlink::domain::repositories::{LinkRepository, OwnerRepository};
use shortlink::infrastructure::memory::{MemoryLinkRepository, MemoryOwnerRepository};
use shortlink::routes::router;
use shortlink::server::build_state;
use shortlink::state::AppState;
use std::sync::Arc;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "http://sho.rt";

pub struct TestApp {
    pub server: TestServer,
    pub links: Arc<MemoryLinkRepository>,
    pub owners: Arc<MemoryOwnerRepository>,
}

impl TestApp {
    /// Registers an owner and returns a raw bearer token for them.
    pub async fn owner_with_token(&self, username: &str) -> (i64, String) {
        let owner = self
            .owners
            .create_owner(NewOwner {
                username: username.to_string(),
                email: format!("{username}@example.com"),
            })
            .await
            .unwrap();

        let raw = format!("token-{username}");
        self.owners
            .create_token(owner.id, "test", &hash_token(SIGNING_SECRET, &raw))
            .await
            .unwrap();

        (owner.id, raw)
    }
}

pub fn test_config(include_retired: bool) -> Config {
    Config {
        storage: StorageKind::Memory,
        database_url: String::new(),
        listen_addr: "127.0.0.1:0".to_string(),
        base_url: BASE_URL.to_string(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        token_signing_secret: SIGNING_SECRET.to_string(),
        list_include_retired: include_retired,
        db_max_connections: 1,
        db_connect_timeout: 1,
        db_idle_timeout: 60,
        db_max_lifetime: 60,
    }
}

pub fn create_test_state(include_retired: bool) -> (AppState, TestStores) {
    let links = Arc::new(MemoryLinkRepository::new());
    let owners = Arc::new(MemoryOwnerRepository::new());

    let state = build_state(
        &test_config(include_retired),
        links.clone() as Arc<dyn LinkRepository>,
        owners.clone() as Arc<dyn OwnerRepository>,
    );

    (state, TestStores { links, owners })
}

pub struct TestStores {
    pub links: Arc<MemoryLinkRepository>,
    pub owners: Arc<MemoryOwnerRepository>,
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(false)
}

pub fn spawn_app_with(include_retired: bool) -> TestApp {
    let (state, stores) = create_test_state(include_retired);
    let server = TestServer::new(router(state)).unwrap();

    TestApp {
        server,
        links: stores.links,
        owners: stores.owners,
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
