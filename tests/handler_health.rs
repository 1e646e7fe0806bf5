mod common;

use async_trait::async_trait;
use axum::{Router, http::StatusCode, routing::get};
use axum_test::TestServer;
use serde_json::json;
use shortlink::api::handlers::health_handler;
use shortlink::domain::entities::{Link, LinkPatch, NewLink};
use shortlink::domain::repositories::LinkRepository;
use shortlink::error::AppError;
use std::sync::Arc;

/// Store whose every call fails, as an unreachable database would.
struct DownLinkRepository;

fn down() -> AppError {
    AppError::internal("Database error", json!({ "reason": "connection refused" }))
}

#[async_trait]
impl LinkRepository for DownLinkRepository {
    async fn create(&self, _new_link: NewLink) -> Result<Link, AppError> {
        Err(down())
    }
    async fn update(&self, _id: i64, _patch: LinkPatch) -> Result<u64, AppError> {
        Err(down())
    }
    async fn find_by_code(&self, _code: &str) -> Result<Option<Link>, AppError> {
        Err(down())
    }
    async fn find_by_id(&self, _id: i64) -> Result<Option<Link>, AppError> {
        Err(down())
    }
    async fn find_all_by_owner(&self, _owner_id: i64) -> Result<Vec<Link>, AppError> {
        Err(down())
    }
    async fn ping(&self) -> Result<(), AppError> {
        Err(down())
    }
}

#[tokio::test]
async fn test_health_endpoint_success() {
    let app = common::spawn_app();

    let response = app.server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["storage"]["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_endpoint_degraded() {
    let (mut state, _stores) = common::create_test_state(false);
    state.link_repository = Arc::new(DownLinkRepository);

    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);
    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["storage"]["status"], "error");
}

#[tokio::test]
async fn test_storage_failure_on_redirect_is_internal_error() {
    let (mut state, _stores) = common::create_test_state(false);
    let failing: Arc<dyn LinkRepository> = Arc::new(DownLinkRepository);
    state.link_service = Arc::new(shortlink::application::services::LinkService::new(
        failing,
        state.identity.clone(),
        Arc::new(shortlink::utils::code_generator::SaltedHashGenerator::new()),
        Default::default(),
    ));

    let server = TestServer::new(shortlink::routes::router(state)).unwrap();

    let response = server.get("/abc123").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "internal_error"
    );
}
