//! DTOs for the link update endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for `PATCH /api/links/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    /// New destination URL for this link.
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
}

/// Number of rows changed by the update.
#[derive(Debug, Serialize)]
pub struct UpdateLinkResponse {
    pub affected: u64,
}
