mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use shortlink::domain::repositories::LinkRepository;

#[tokio::test]
async fn test_shorten_anonymous() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/some/long/path" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.json::<Value>();
    let code = body["code"].as_str().unwrap();

    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(body["original_url"], "https://example.com/some/long/path");
    assert_eq!(body["short_url"], format!("{}/{}", common::BASE_URL, code));
    assert_eq!(body["owned"], false);

    let stored = app.links.find_by_code(code).await.unwrap().unwrap();
    assert_eq!(stored.access_count, 0);
    assert!(stored.owner_id.is_none());
    assert!(stored.deleted_at.is_none());
}

#[tokio::test]
async fn test_shorten_with_valid_token_attaches_owner() {
    let app = common::spawn_app();
    let (owner_id, token) = app.owner_with_token("alice").await;

    let response = app
        .server
        .post("/api/shorten")
        .add_header("Authorization", common::bearer(&token))
        .json(&json!({ "url": "https://example.com/owned" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.json::<Value>();
    assert_eq!(body["owned"], true);

    let id = body["id"].as_i64().unwrap();
    let stored = app.links.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.owner_id, Some(owner_id));
}

#[tokio::test]
async fn test_shorten_with_unknown_token_is_anonymous() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/api/shorten")
        .add_header("Authorization", common::bearer("no-such-token"))
        .json(&json!({ "url": "https://example.com/" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["owned"], false);
}

#[tokio::test]
async fn test_shorten_same_url_twice_gives_distinct_links() {
    let app = common::spawn_app();

    let first = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/dup" }))
        .await
        .json::<Value>();
    let second = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/dup" }))
        .await
        .json::<Value>();

    assert_ne!(first["id"], second["id"]);
    assert_ne!(first["code"], second["code"]);
}

#[tokio::test]
async fn test_shorten_rejects_invalid_url() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "not a url" }))
        .await;

    response.assert_status_bad_request();

    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(app.links.is_empty());
}

#[tokio::test]
async fn test_shorten_rejects_empty_url() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "" }))
        .await;

    response.assert_status_bad_request();
    assert!(app.links.is_empty());
}

#[tokio::test]
async fn test_shorten_stores_redirectable_url_for_control_characters() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/\u{1}x" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["original_url"], "https://example.com/%01x");

    let code = body["code"].as_str().unwrap();
    let redirect = app.server.get(&format!("/{code}")).await;

    redirect.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        redirect.header("location").to_str().unwrap(),
        "https://example.com/%01x"
    );

    let stored = app.links.find_by_code(code).await.unwrap().unwrap();
    assert_eq!(stored.access_count, 1);
}

#[tokio::test]
async fn test_shorten_rejects_non_http_scheme() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "javascript:alert(1)" }))
        .await;

    response.assert_status_bad_request();
    assert!(app.links.is_empty());
}
