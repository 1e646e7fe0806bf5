//! URL canonicalization before storage.

use serde_json::json;
use url::Url;

use crate::error::AppError;

/// Parses `input` and returns its serialized form.
///
/// Only HTTP and HTTPS are allowed. Serialization lowercases the host, drops default
/// ports and percent-encodes characters that cannot appear in a URL (control
/// characters, spaces), so the stored value is always usable as a `Location` header.
///
/// # Errors
///
/// Returns [`AppError::Validation`] for malformed URLs and other schemes.
pub fn normalize_url(input: &str) -> Result<String, AppError> {
    let url = Url::parse(input.trim()).map_err(|e| {
        AppError::bad_request(
            "Invalid URL format",
            json!({ "field": "url", "reason": e.to_string() }),
        )
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url.into()),
        scheme => Err(AppError::bad_request(
            "Only HTTP and HTTPS URLs can be shortened",
            json!({ "field": "url", "scheme": scheme }),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_ordinary_url() {
        assert_eq!(
            normalize_url("https://example.com/some/path?q=1").unwrap(),
            "https://example.com/some/path?q=1"
        );
    }

    #[test]
    fn test_canonical_host_and_port() {
        assert_eq!(
            normalize_url("HTTPS://EXAMPLE.COM:443/Path").unwrap(),
            "https://example.com/Path"
        );
    }

    #[test]
    fn test_encodes_control_characters() {
        let normalized = normalize_url("https://example.com/\u{1}x").unwrap();

        assert_eq!(normalized, "https://example.com/%01x");
        assert!(normalized.chars().all(|c| c.is_ascii_graphic()));
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(matches!(
            normalize_url("javascript:alert(1)"),
            Err(AppError::Validation { .. })
        ));
        assert!(normalize_url("ftp://example.com/file").is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(normalize_url("not a url").is_err());
    }
}
