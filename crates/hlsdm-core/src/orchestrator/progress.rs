//! Progress events published while a job runs.

use serde::Serialize;

use crate::job_store::{JobId, JobState, JobStatus};

/// One progress update for a job (CLI-friendly).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProgress {
    pub id: JobId,
    pub status: JobStatus,
    pub downloaded_segments: usize,
    pub total_segments: usize,
}

impl JobProgress {
    pub(crate) fn from_state(id: JobId, state: &JobState) -> Self {
        Self {
            id,
            status: state.status(),
            downloaded_segments: state.downloaded_segments(),
            total_segments: state.total_segments(),
        }
    }

    /// Fraction complete in [0.0, 1.0]. An empty playlist counts as done.
    pub fn fraction(&self) -> f64 {
        if self.total_segments == 0 {
            return 1.0;
        }
        (self.downloaded_segments as f64 / self.total_segments as f64).min(1.0)
    }
}

pub type ProgressSender = tokio::sync::mpsc::UnboundedSender<JobProgress>;
