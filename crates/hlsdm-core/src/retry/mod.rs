//! Retry and backoff policy for manifest and segment fetches.
//!
//! Classifies fetch failures (timeouts, throttling, connection failures)
//! and decides on capped exponential backoff. The default policy never
//! retries; `[retry]` in the config turns bounded retry on.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::FetchError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
