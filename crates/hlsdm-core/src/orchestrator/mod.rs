//! Download orchestrator.
//!
//! Creates jobs from manifest URLs and drives them: parse the stored
//! manifest, resolve and fetch each segment in order, persist it, and advance
//! the job in the store. Blocking work (curl, file I/O) runs on tokio's
//! blocking pool; many jobs can run at once, segments of one job never do.
//!
//! At most one run per job is in flight. `drive` on a job that is terminal or
//! already running elsewhere returns its current snapshot.

mod create;
mod guard;
mod invoke;
mod parallel;
mod progress;
mod run;

pub use progress::{JobProgress, ProgressSender};

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::HlsdmConfig;
use crate::control::JobControl;
use crate::error::{JobError, JobFailure};
use crate::fetch::{FetchOptions, HttpClient};
use crate::job_store::{JobId, JobSnapshot, JobStore};
use crate::retry::RetryPolicy;

use self::guard::RunGuard;
use self::run::JobRun;

/// Cheap to clone; clones share the store and control registry.
#[derive(Clone)]
pub struct Orchestrator {
    store: Arc<JobStore>,
    control: Arc<JobControl>,
    client: HttpClient,
    retry: RetryPolicy,
    progress: Option<ProgressSender>,
}

impl Orchestrator {
    /// Orchestrator with an empty store rooted at `download_root`, using the
    /// config's timeouts and retry policy.
    pub fn new(cfg: &HlsdmConfig, download_root: impl Into<PathBuf>) -> Self {
        Self::from_parts(
            Arc::new(JobStore::new(download_root)),
            HttpClient::new(FetchOptions::from_config(cfg)),
            cfg.retry_policy(),
        )
    }

    pub fn from_parts(store: Arc<JobStore>, client: HttpClient, retry: RetryPolicy) -> Self {
        Self {
            store,
            control: Arc::new(JobControl::new()),
            client,
            retry,
            progress: None,
        }
    }

    /// Publish progress events on `tx`.
    pub fn with_progress(mut self, tx: ProgressSender) -> Self {
        self.progress = Some(tx);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Fetches and stores the manifest, then returns the new `ReadyToDownload` job.
    pub async fn create_job(&self, url: &str) -> Result<JobSnapshot, JobError> {
        let store = Arc::clone(&self.store);
        let client = self.client.clone();
        let retry = self.retry;
        let url = url.to_string();
        tokio::task::spawn_blocking(move || {
            create::create_job_blocking(&store, &client, &retry, &url)
        })
        .await
        .unwrap_or_else(|e| {
            if e.is_panic() {
                std::panic::resume_unwind(e.into_panic());
            }
            Err(JobError::Interrupted)
        })
    }

    /// Runs the job to a terminal state and returns the final snapshot.
    ///
    /// Returns `Err` when this run failed (the job is then `Failed` in the
    /// store). A job that is already terminal, or already being driven by
    /// another caller, is returned as is.
    pub async fn drive(&self, id: JobId) -> Result<JobSnapshot, JobError> {
        let job = self.store.get(&id)?;
        if job.status.is_terminal() {
            return Ok(job);
        }
        let Some(abort) = self.control.try_register(id) else {
            tracing::debug!(job_id = %id, "job already in flight");
            return Ok(job);
        };

        let run = JobRun {
            id,
            store: Arc::clone(&self.store),
            client: self.client.clone(),
            retry: self.retry,
            progress: self.progress.clone(),
            abort,
            guard: RunGuard {
                id,
                store: Arc::clone(&self.store),
                control: Arc::clone(&self.control),
            },
        };
        invoke::run_job_blocking(run).await?;
        self.store.get(&id)
    }

    /// `create_job` followed by `drive`.
    pub async fn download(&self, url: &str) -> Result<JobSnapshot, JobError> {
        let job = self.create_job(url).await?;
        self.drive(job.id).await
    }

    /// Drives the job on its own task; poll with `status`.
    pub fn spawn(&self, id: JobId) -> tokio::task::JoinHandle<Result<JobSnapshot, JobError>> {
        let this = self.clone();
        tokio::spawn(async move { this.drive(id).await })
    }

    /// Current snapshot. Never waits on a running download.
    pub fn status(&self, id: &JobId) -> Result<JobSnapshot, JobError> {
        self.store.get(id)
    }

    /// Cancels a job. A running job stops before its next segment; a job that
    /// is not running is marked `Failed` right away. Returns false if the job
    /// was already terminal.
    pub fn cancel(&self, id: &JobId) -> Result<bool, JobError> {
        if self.store.get(id)?.status.is_terminal() {
            return Ok(false);
        }
        if self.control.request_abort(id) {
            tracing::info!(job_id = %id, "cancel requested");
            return Ok(true);
        }
        let failure = JobFailure::from(&JobError::Cancelled(*id));
        let cancelled = self.store.update(id, |st| st.fail(failure))?;
        if cancelled {
            tracing::info!(job_id = %id, "job cancelled before start");
        }
        Ok(cancelled)
    }

    /// All jobs, newest first.
    pub fn list(&self) -> Vec<JobSnapshot> {
        self.store.list()
    }
}
