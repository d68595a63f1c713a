//! Retry loop: run a closure until success or policy says stop.

use super::classify;
use super::error::FetchError;
use super::policy::{RetryDecision, RetryPolicy};

/// Runs `f` until it succeeds or the retry policy says to stop.
/// On retryable failure, sleeps for the backoff duration then tries again.
/// Blocking; call from a blocking thread.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, FetchError>
where
    F: FnMut() -> Result<T, FetchError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(d) => {
                        tracing::debug!(attempt, ?kind, delay_ms = d.as_millis() as u64, "retrying after: {}", e);
                        std::thread::sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    #[test]
    fn retries_until_success() {
        let mut calls = 0;
        let out = run_with_retry(&fast_policy(3), || {
            calls += 1;
            if calls < 3 {
                Err(FetchError::Http(503))
            } else {
                Ok(calls)
            }
        })
        .unwrap();
        assert_eq!(out, 3);
    }

    #[test]
    fn stops_on_non_retryable() {
        let mut calls = 0;
        let err = run_with_retry(&fast_policy(5), || -> Result<(), FetchError> {
            calls += 1;
            Err(FetchError::Http(404))
        })
        .unwrap_err();
        assert!(matches!(err, FetchError::Http(404)));
        assert_eq!(calls, 1);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut calls = 0;
        let err = run_with_retry(&fast_policy(2), || -> Result<(), FetchError> {
            calls += 1;
            Err(FetchError::Http(500))
        })
        .unwrap_err();
        assert!(matches!(err, FetchError::Http(500)));
        assert_eq!(calls, 2);
    }
}
