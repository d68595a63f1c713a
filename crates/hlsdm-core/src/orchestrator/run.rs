//! Blocking orchestration loop for one job.
//!
//! Parse the stored manifest, record the segment list, then fetch segments
//! strictly in order. Any error stops the loop and marks the job `Failed`;
//! the already persisted prefix and its count are kept.

use std::path::Path;
use std::sync::Arc;

use crate::control::AbortToken;
use crate::error::{JobError, JobFailure};
use crate::fetch::HttpClient;
use crate::job_store::{JobId, JobStatus, JobStore};
use crate::locator::resolve_segment_url;
use crate::playlist::{parse_playlist_bytes, PlaylistError};
use crate::retry::{run_with_retry, FetchError, RetryPolicy};
use crate::storage::JobStorage;

use super::guard::RunGuard;
use super::progress::{JobProgress, ProgressSender};

/// Everything one run needs; moved into the blocking task. Dropping it
/// releases the job's registration through `guard`.
pub(super) struct JobRun {
    pub id: JobId,
    pub store: Arc<JobStore>,
    pub client: HttpClient,
    pub retry: RetryPolicy,
    pub progress: Option<ProgressSender>,
    pub abort: AbortToken,
    pub guard: RunGuard,
}

impl JobRun {
    /// Runs the job to a terminal state (or resumes a `Downloading` one from
    /// its persisted prefix). On error the job is marked `Failed` first.
    pub fn execute(&self) -> Result<(), JobError> {
        match self.run_to_end() {
            Ok(()) => Ok(()),
            Err(e) => {
                self.mark_failed(&e);
                Err(e)
            }
        }
    }

    fn run_to_end(&self) -> Result<(), JobError> {
        let job = self.store.get(&self.id)?;
        let storage = JobStorage::open(&job.storage_location);

        if job.status == JobStatus::ReadyToDownload {
            let bytes = storage.read_manifest().map_err(|e| {
                PlaylistError::UnreadableInput(format!(
                    "cannot read {}: {}",
                    storage.manifest_path().display(),
                    e
                ))
            })?;
            let playlist = parse_playlist_bytes(&bytes)?;
            if !playlist.complete {
                tracing::warn!(job_id = %self.id, "playlist has no #EXT-X-ENDLIST, downloading the segments listed now");
            }
            tracing::info!(
                job_id = %self.id,
                segments = playlist.len(),
                duration_secs = playlist.total_duration(),
                "manifest parsed"
            );
            let refs = playlist.segment_references();
            let progress = self.store.update(&self.id, |st| {
                st.record_segments(refs);
                st.begin_download();
                JobProgress::from_state(self.id, st)
            })?;
            self.emit(progress);
        }

        let job = self.store.get(&self.id)?;
        if job.status != JobStatus::Downloading {
            return Ok(());
        }

        for (index, reference) in job.segments.iter().enumerate().skip(job.downloaded_segments) {
            if self.abort.is_aborted() {
                return Err(JobError::Cancelled(self.id));
            }
            let url = resolve_segment_url(reference, &job.source_url)?;
            self.fetch_segment(&storage, index, &url)?;
            let (advanced, progress) = self.store.update(&self.id, |st| {
                (st.mark_segment_done(index), JobProgress::from_state(self.id, st))
            })?;
            if !advanced {
                // Failed elsewhere while this segment was in flight.
                tracing::debug!(job_id = %self.id, index, "job left Downloading, stopping");
                return Ok(());
            }
            tracing::debug!(job_id = %self.id, index, url = %url, "segment stored");
            self.emit(progress);
        }

        let (done, progress) = self
            .store
            .update(&self.id, |st| (st.complete(), JobProgress::from_state(self.id, st)))?;
        if done {
            tracing::info!(job_id = %self.id, segments = progress.total_segments, "job downloaded");
            self.emit(progress);
        }
        Ok(())
    }

    /// GETs one segment into `<index>.ts` via its temp file.
    fn fetch_segment(&self, storage: &JobStorage, index: usize, url: &str) -> Result<(), JobError> {
        let path = storage.segment_path(index);
        run_with_retry(&self.retry, || {
            let mut writer = storage.begin_segment(index).map_err(FetchError::Storage)?;
            self.client.get_into(url, &mut writer)?;
            writer.finalize().map_err(FetchError::Storage)?;
            Ok(())
        })
        .map_err(|e| fetch_failure(url, &path, e))
    }

    fn mark_failed(&self, e: &JobError) {
        if matches!(e, JobError::NotFound(_)) {
            return;
        }
        tracing::error!(job_id = %self.id, kind = ?e.kind(), "job failed: {}", e);
        let failure = JobFailure::from(e);
        match self
            .store
            .update(&self.id, |st| (st.fail(failure), JobProgress::from_state(self.id, st)))
        {
            Ok((true, progress)) => self.emit(progress),
            Ok((false, _)) => {}
            Err(err) => tracing::warn!(job_id = %self.id, "cannot mark job failed: {}", err),
        }
    }

    fn emit(&self, progress: JobProgress) {
        if let Some(tx) = &self.progress {
            // Receiver gone just means nobody is watching.
            let _ = tx.send(progress);
        }
    }
}

/// Local write errors are storage failures; everything else means the remote
/// could not be read.
pub(super) fn fetch_failure(url: &str, path: &Path, e: FetchError) -> JobError {
    match e {
        FetchError::Storage(source) => JobError::storage(path, source),
        other => JobError::UnreadableSource {
            url: url.to_string(),
            source: other,
        },
    }
}
