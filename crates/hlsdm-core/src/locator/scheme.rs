//! Scheme detection for segment references.

/// Schemes treated as already-absolute fetch addresses.
const RECOGNIZED_SCHEMES: &[&str] = &["http", "https"];

/// True if `reference` starts with `http:` or `https:` (case-insensitive).
///
/// Works on any length of input; `"h"` or `"http"` without a colon are relative.
pub fn is_absolute_reference(reference: &str) -> bool {
    let Some((scheme, _)) = reference.split_once(':') else {
        return false;
    };
    RECOGNIZED_SCHEMES
        .iter()
        .any(|s| scheme.eq_ignore_ascii_case(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_http_and_https() {
        assert!(is_absolute_reference("http://a/b.ts"));
        assert!(is_absolute_reference("https://a/b.ts"));
        assert!(is_absolute_reference("HTTPS://a/b.ts"));
    }

    #[test]
    fn everything_else_is_relative() {
        assert!(!is_absolute_reference(""));
        assert!(!is_absolute_reference("h"));
        assert!(!is_absolute_reference("http"));
        assert!(!is_absolute_reference("httpx://a"));
        assert!(!is_absolute_reference("seg:1.ts"));
        assert!(!is_absolute_reference("/abs/path.ts"));
    }
}
