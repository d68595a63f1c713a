//! Fetch error type for retry classification.

use std::fmt;

/// Error returned by a single HTTP fetch (curl failure, HTTP error, or local write failure).
/// Kept separate from `JobError` so retries can be decided on the raw cause.
#[derive(Debug)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection refused, empty reply, ...).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status.
    Http(u32),
    /// Writing the body locally failed (disk full, permission denied). Not retried.
    Storage(std::io::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Curl(e) => write!(f, "{}", e),
            FetchError::Http(code) => write!(f, "HTTP {}", code),
            FetchError::Storage(e) => write!(f, "storage: {}", e),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Curl(e) => Some(e),
            FetchError::Storage(e) => Some(e),
            FetchError::Http(_) => None,
        }
    }
}
