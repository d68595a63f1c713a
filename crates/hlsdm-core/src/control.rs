//! Job control: shared abort tokens for jobs that are being driven.
//!
//! The orchestrator registers a job before its loop starts and unregisters it
//! when the loop ends. Registration doubles as the "already in flight" check:
//! a second `drive` for the same id sees `try_register` fail and backs off.
//! `request_abort` flips the token; the loop checks it before every segment.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::job_store::JobId;

/// Abort token handed to a running job loop.
#[derive(Debug, Clone, Default)]
pub struct AbortToken(Arc<AtomicBool>);

impl AbortToken {
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Shared registry of job id -> abort token.
#[derive(Debug, Default)]
pub struct JobControl {
    jobs: RwLock<HashMap<JobId, AbortToken>>,
}

impl JobControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a job about to be driven. Returns `None` if it already is.
    pub fn try_register(&self, job_id: JobId) -> Option<AbortToken> {
        let mut jobs = self.jobs.write();
        if jobs.contains_key(&job_id) {
            return None;
        }
        let token = AbortToken::default();
        jobs.insert(job_id, token.clone());
        Some(token)
    }

    /// Call when the job loop finishes, success or failure.
    pub fn unregister(&self, job_id: &JobId) {
        self.jobs.write().remove(job_id);
    }

    #[cfg(test)]
    pub(crate) fn is_registered(&self, job_id: &JobId) -> bool {
        self.jobs.read().contains_key(job_id)
    }

    /// Sets the job's abort token. Returns false if the job is not running.
    pub fn request_abort(&self, job_id: &JobId) -> bool {
        match self.jobs.read().get(job_id) {
            Some(token) => {
                token.abort();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_exclusive_until_unregistered() {
        let ctl = JobControl::new();
        let id = JobId::new_v4();
        let token = ctl.try_register(id).unwrap();
        assert!(ctl.is_registered(&id));
        assert!(ctl.try_register(id).is_none());
        assert!(!token.is_aborted());
        ctl.unregister(&id);
        assert!(!ctl.is_registered(&id));
        assert!(ctl.try_register(id).is_some());
    }

    #[test]
    fn abort_reaches_the_registered_token() {
        let ctl = JobControl::new();
        let id = JobId::new_v4();
        let token = ctl.try_register(id).unwrap();
        assert!(ctl.request_abort(&id));
        assert!(token.is_aborted());
        assert!(!ctl.request_abort(&JobId::new_v4()));
    }
}
