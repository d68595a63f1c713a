//! RAII guard that releases a job's run registration when dropped.

use std::sync::Arc;

use crate::control::JobControl;
use crate::error::{JobError, JobFailure};
use crate::job_store::{JobId, JobStore};

/// Owned by the blocking run, so the job stays registered exactly as long as
/// its loop is alive, even if the `drive` future awaiting it is dropped.
///
/// A job still non-terminal at drop time (panic in the loop, or the task
/// never ran) is marked `Failed` with `Interrupted` before the registration
/// goes away, so no later `drive` sees it stuck in `Downloading`.
pub(super) struct RunGuard {
    pub(super) id: JobId,
    pub(super) store: Arc<JobStore>,
    pub(super) control: Arc<JobControl>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        let failure = JobFailure::from(&JobError::Interrupted);
        if let Ok(true) = self.store.update(&self.id, |st| st.fail(failure)) {
            tracing::warn!(
                job_id = %self.id,
                panicking = std::thread::panicking(),
                "job run ended before a terminal state, marked failed"
            );
        }
        self.control.unregister(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::job_store::JobStatus;

    fn registered(store: &Arc<JobStore>, control: &Arc<JobControl>) -> RunGuard {
        let id = store.create("https://example.com/x.m3u8").id;
        store
            .update(&id, |st| {
                st.record_segments(vec!["a.ts".into(), "b.ts".into()]);
                st.begin_download();
                st.mark_segment_done(0);
            })
            .unwrap();
        control.try_register(id).unwrap();
        RunGuard {
            id,
            store: Arc::clone(store),
            control: Arc::clone(control),
        }
    }

    #[test]
    fn panic_in_run_fails_and_unregisters() {
        let store = Arc::new(JobStore::new("/tmp/hlsdm-guard-test"));
        let control = Arc::new(JobControl::new());
        let guard = registered(&store, &control);
        let id = guard.id;

        let joined = std::thread::spawn(move || {
            let _guard = guard;
            panic!("segment loop blew up");
        })
        .join();
        assert!(joined.is_err());

        let job = store.get(&id).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.downloaded_segments, 1);
        assert_eq!(job.failure.unwrap().kind, FailureKind::Interrupted);
        assert!(!control.is_registered(&id));
        assert!(control.try_register(id).is_some());
    }

    #[test]
    fn terminal_job_is_left_alone() {
        let store = Arc::new(JobStore::new("/tmp/hlsdm-guard-test"));
        let control = Arc::new(JobControl::new());
        let guard = registered(&store, &control);
        let id = guard.id;
        store
            .update(&id, |st| {
                st.mark_segment_done(1);
                st.complete();
            })
            .unwrap();

        drop(guard);
        let job = store.get(&id).unwrap();
        assert_eq!(job.status, JobStatus::Downloaded);
        assert!(job.failure.is_none());
        assert!(!control.is_registered(&id));
    }
}
