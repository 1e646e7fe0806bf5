//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::bearer::bearer_token;
use crate::utils::url_normalizer::normalize_url;

/// Creates a short link for a long URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Authentication
///
/// Optional. A bearer token that resolves to an owner attaches the link to them;
/// anything else creates an anonymous link.
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "id": 42,
///   "code": "3xYz9A",
///   "short_url": "http://localhost:3000/3xYz9A",
///   "original_url": "https://example.com/some/long/path",
///   "owned": false
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is missing, malformed, or not HTTP(S).
/// Returns 503 Service Unavailable if no free code was found.
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;
    let original_url = normalize_url(&payload.url)?;

    let credential = bearer_token(&headers);

    let link = state
        .link_service
        .create_short_link(original_url, credential.as_deref())
        .await?;

    let short_url = state
        .link_service
        .short_url(&state.base_url, &link.short_code);

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse::from_link(link, short_url)),
    ))
}
