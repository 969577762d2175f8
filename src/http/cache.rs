//! Conditional request support for static assets

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Quoted `ETag` derived from the asset content, e.g. `"9f1c2e"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// Whether the client's `If-None-Match` value covers `etag`
///
/// Accepts a single tag, a comma separated list, or `*`.
pub fn is_not_modified(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client| {
        client
            .split(',')
            .map(str::trim)
            .any(|tag| tag == etag || tag == "*")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etag_is_stable_and_quoted() {
        let a = generate_etag(b"index.html contents");
        assert!(a.starts_with('"') && a.ends_with('"'));
        assert_eq!(a, generate_etag(b"index.html contents"));
        assert_ne!(a, generate_etag(b"other contents"));
    }

    #[test]
    fn test_is_not_modified() {
        let etag = "\"abc123\"";
        assert!(is_not_modified(Some("\"abc123\""), etag));
        assert!(is_not_modified(Some("\"xyz\", \"abc123\""), etag));
        assert!(is_not_modified(Some("*"), etag));
        assert!(!is_not_modified(Some("\"different\""), etag));
        assert!(!is_not_modified(None, etag));
    }
}
