//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten (must be valid HTTP/HTTPS).
    #[validate(length(min = 1, message = "URL must not be empty"))]
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
}

/// Created short link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub id: i64,
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    /// Whether the link was attached to the caller.
    pub owned: bool,
}

impl ShortenResponse {
    pub fn from_link(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            owned: link.owner_id.is_some(),
            code: link.short_code,
            short_url,
            original_url: link.original_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str) -> ShortenRequest {
        ShortenRequest {
            url: url.to_string(),
        }
    }

    #[test]
    fn test_valid_url() {
        assert!(request("https://example.com/a?b=c").validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_and_malformed() {
        assert!(request("").validate().is_err());
        assert!(request("not a url").validate().is_err());
    }
}
