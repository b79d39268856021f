//! Shared-secret check for the inbound webhook

use axum::http::HeaderMap;
use sha2::{Digest, Sha256};

/// Header carrying the shared secret
pub const AUTH_HEADER: &str = "x-auth-token";

/// True when the request carries `expected` in [`AUTH_HEADER`]
pub fn is_authorized(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(AUTH_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|provided| secrets_match(provided, expected))
}

/// Compare fixed-size digests so the time taken does not depend on where the
/// inputs first differ
fn secrets_match(provided: &str, expected: &str) -> bool {
    let provided = Sha256::digest(provided.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    provided
        .iter()
        .zip(expected.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue};

    fn headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTH_HEADER, HeaderValue::from_str(token).unwrap());
        headers
    }

    #[test]
    fn test_matching_secret() {
        assert!(is_authorized(&headers("hook-secret"), "hook-secret"));
    }

    #[test]
    fn test_wrong_or_missing_secret() {
        assert!(!is_authorized(&headers("hook-secreT"), "hook-secret"));
        assert!(!is_authorized(&headers("hook-secret "), "hook-secret"));
        assert!(!is_authorized(&HeaderMap::new(), "hook-secret"));
    }

    #[test]
    fn test_header_name_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_bytes(b"X-AUTH-TOKEN").unwrap(),
            HeaderValue::from_static("s3cret"),
        );
        assert!(is_authorized(&headers, "s3cret"));
    }
}
