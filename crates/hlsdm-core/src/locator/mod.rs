//! Segment locator: turns a segment reference into a fetchable address.
//!
//! Absolute `http`/`https` references pass through untouched; anything else
//! is resolved against the manifest URL with RFC 3986 rules (`Url::join`),
//! so `seg0.ts` next to `https://cdn/show/index.m3u8` becomes
//! `https://cdn/show/seg0.ts`. Pure, no I/O.

mod scheme;

pub use scheme::is_absolute_reference;

use url::Url;

/// The manifest URL could not serve as a base for relative references.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed base URL {base:?}: {reason}")]
pub struct MalformedBaseUrl {
    pub base: String,
    pub reason: String,
}

/// Resolves `reference` against `source_url`.
///
/// # Examples
///
/// - `resolve_segment_url("seg0.ts", "https://cdn.example.com/show/index.m3u8")` → `"https://cdn.example.com/show/seg0.ts"`
/// - `resolve_segment_url("https://other.example.com/x.ts", _)` → unchanged
pub fn resolve_segment_url(reference: &str, source_url: &str) -> Result<String, MalformedBaseUrl> {
    if is_absolute_reference(reference) {
        return Ok(reference.to_string());
    }
    let base = parse_base(source_url)?;
    // A colon in the first path segment would read as a scheme ("seg:1.ts").
    let first_segment = reference.split('/').next().unwrap_or_default();
    let joined = if first_segment.contains(':') {
        base.join(&format!("./{}", reference))
    } else {
        base.join(reference)
    };
    joined
        .map(String::from)
        .map_err(|e| MalformedBaseUrl {
            base: source_url.to_string(),
            reason: e.to_string(),
        })
}

/// Parses `source_url` and checks it can act as a base (has a host-style path).
pub fn parse_base(source_url: &str) -> Result<Url, MalformedBaseUrl> {
    let base = Url::parse(source_url).map_err(|e| MalformedBaseUrl {
        base: source_url.to_string(),
        reason: e.to_string(),
    })?;
    if base.cannot_be_a_base() {
        return Err(MalformedBaseUrl {
            base: source_url.to_string(),
            reason: "URL cannot be a base".to_string(),
        });
    }
    Ok(base)
}
