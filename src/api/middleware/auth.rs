//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Owner resolved from the request's bearer token.
///
/// Inserted into request extensions by [`layer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentOwner(pub i64);

/// Requires a bearer token that resolves to an owner.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// On success the owner id is available to handlers as `Extension<CurrentOwner>`.
///
/// # Errors
///
/// Returns `401 Unauthorized` (with `WWW-Authenticate: Bearer`) if the header is
/// missing, malformed, or the token is unknown or revoked.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let owner_id = st.identity.resolve(&token).await?.ok_or_else(|| {
        AppError::unauthorized("Unauthorized", json!({"reason": "Unknown or revoked token"}))
    })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(CurrentOwner(owner_id));

    Ok(next.run(req).await)
}
