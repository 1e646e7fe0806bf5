//! Handlers for link management endpoints (list, get, update, delete).

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::link::{LinkListResponse, LinkResponse};
use crate::api::dto::update_link::{UpdateLinkRequest, UpdateLinkResponse};
use crate::api::middleware::CurrentOwner;
use crate::domain::entities::Link;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::bearer::bearer_token;
use crate::utils::url_normalizer::normalize_url;

fn to_response(state: &AppState, link: Link) -> LinkResponse {
    let short_url = state
        .link_service
        .short_url(&state.base_url, &link.short_code);
    LinkResponse::from_link(link, short_url)
}

/// Lists links owned by the caller.
///
/// # Endpoint
///
/// `GET /api/links`
///
/// # Authentication
///
/// Optional. Without a token, or with one that does not resolve, the list is empty.
///
/// # Response
///
/// ```json
/// { "items": [ { "id": 1, "code": "3xYz9A", ... } ], "total": 1 }
/// ```
pub async fn list_links_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LinkListResponse>, AppError> {
    let credential = bearer_token(&headers);

    let links = state
        .link_service
        .list_for_owner(credential.as_deref())
        .await?;

    let items: Vec<LinkResponse> = links
        .into_iter()
        .map(|link| to_response(&state, link))
        .collect();

    Ok(Json(LinkListResponse {
        total: items.len(),
        items,
    }))
}

/// Returns one of the caller's links, deleted ones included.
///
/// `GET /api/links/{id}`
pub async fn get_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(CurrentOwner(owner_id)): Extension<CurrentOwner>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_owned_link(owner_id, id).await?;

    Ok(Json(to_response(&state, link)))
}

/// Changes the destination of one of the caller's links.
///
/// # Endpoint
///
/// `PATCH /api/links/{id}`
///
/// # Request Body
///
/// ```json
/// { "url": "https://new-destination.com" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 404 Not Found if the link doesn't exist, belongs to someone else,
/// or was deleted.
pub async fn update_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(CurrentOwner(owner_id)): Extension<CurrentOwner>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<UpdateLinkResponse>, AppError> {
    payload.validate()?;
    let original_url = normalize_url(&payload.url)?;

    let affected = state
        .link_service
        .update_for_owner(owner_id, id, original_url)
        .await?;

    if affected == 0 {
        return Err(AppError::not_found(
            "Link not found or deleted",
            json!({ "id": id }),
        ));
    }

    Ok(Json(UpdateLinkResponse { affected }))
}

/// Soft-deletes one of the caller's links.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}`
///
/// The row is kept with `deleted_at` set; its code stops redirecting and may be
/// handed out again.
///
/// # Errors
///
/// Returns 404 Not Found if the link doesn't exist, belongs to someone else,
/// or is already deleted.
pub async fn delete_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(CurrentOwner(owner_id)): Extension<CurrentOwner>,
) -> Result<StatusCode, AppError> {
    let affected = state
        .link_service
        .soft_delete_for_owner(owner_id, id)
        .await?;

    if affected == 0 {
        return Err(AppError::not_found(
            "Link not found or already deleted",
            json!({ "id": id }),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
