//! Download several playlists concurrently.
//!
//! Keeps up to `max_concurrent` jobs running at once; when one finishes,
//! the next queued URL is started until the queue is empty.

use tokio::task::JoinSet;

use crate::error::JobError;
use crate::job_store::JobSnapshot;

use super::Orchestrator;

impl Orchestrator {
    /// Creates and drives one job per URL. Results come back in input order.
    ///
    /// A URL whose job was created yields `Ok` with the final snapshot, even
    /// when the run failed (`status == Failed`, `failure` set). `Err` means no
    /// usable job exists: the manifest could not be fetched or stored.
    pub async fn download_all(
        &self,
        urls: Vec<String>,
        max_concurrent: usize,
    ) -> Vec<Result<JobSnapshot, JobError>> {
        let max_concurrent = max_concurrent.max(1);
        let mut results: Vec<Option<Result<JobSnapshot, JobError>>> =
            urls.iter().map(|_| None).collect();
        let mut queue = urls.into_iter().enumerate();
        let mut join_set = JoinSet::new();

        loop {
            while join_set.len() < max_concurrent {
                let Some((index, url)) = queue.next() else {
                    break;
                };
                let this = self.clone();
                join_set.spawn(async move { (index, this.create_and_drive(&url).await) });
            }

            let Some(joined) = join_set.join_next().await else {
                break;
            };
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => tracing::error!("download task join: {}", e),
            }
        }

        results
            .into_iter()
            .map(|r| r.unwrap_or(Err(JobError::Interrupted)))
            .collect()
    }

    async fn create_and_drive(&self, url: &str) -> Result<JobSnapshot, JobError> {
        let job = self.create_job(url).await?;
        match self.drive(job.id).await {
            Ok(done) => Ok(done),
            Err(e) => {
                tracing::debug!(job_id = %job.id, "run ended with error: {}", e);
                self.status(&job.id)
            }
        }
    }
}
