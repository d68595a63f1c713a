//! Job creation: fetch the manifest, then create and populate the record.

use std::sync::Arc;

use crate::error::{JobError, JobFailure};
use crate::fetch::HttpClient;
use crate::job_store::{JobSnapshot, JobStore};
use crate::retry::{run_with_retry, RetryPolicy};
use crate::storage::JobStorage;

use super::run::fetch_failure;

/// Blocking. A manifest that cannot be fetched creates no job. Once the job
/// exists, a failure to store the manifest marks it `Failed`.
pub(super) fn create_job_blocking(
    store: &Arc<JobStore>,
    client: &HttpClient,
    retry: &RetryPolicy,
    url: &str,
) -> Result<JobSnapshot, JobError> {
    let body = run_with_retry(retry, || client.get_bytes(url))
        .map_err(|e| fetch_failure(url, store.storage_root(), e))?;
    tracing::debug!(url, bytes = body.len(), "manifest fetched");

    let job = store.create(url);
    let stored = JobStorage::create(&job.storage_location)
        .and_then(|storage| storage.write_manifest(&body))
        .map_err(|e| JobError::storage(job.manifest_path(), e));
    if let Err(e) = stored {
        tracing::error!(job_id = %job.id, "cannot store manifest: {}", e);
        let failure = JobFailure::from(&e);
        store.update(&job.id, |st| st.fail(failure))?;
        return Err(e);
    }
    tracing::info!(job_id = %job.id, url, dir = %job.storage_location.display(), "job created");
    Ok(job)
}
