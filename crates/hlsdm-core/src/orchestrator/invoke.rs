//! Run the blocking job loop on tokio's blocking pool.

use crate::error::JobError;

use super::run::JobRun;

/// Runs `run.execute()` in `spawn_blocking`. A panic in the loop is resumed on
/// the caller; any other join failure reports `Interrupted`. Either way the
/// run's guard has already released the job.
pub(super) async fn run_job_blocking(run: JobRun) -> Result<(), JobError> {
    let id = run.id;
    match tokio::task::spawn_blocking(move || run.execute()).await {
        Ok(result) => result,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => {
            tracing::error!(job_id = %id, "job task join: {}", e);
            Err(JobError::Interrupted)
        }
    }
}
