//! Types held by the job store.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::JobFailure;

/// Job identifier (random UUID v4).
pub type JobId = uuid::Uuid;

/// File name of the manifest copy inside a job's storage location.
pub const MANIFEST_FILENAME: &str = "main.m3u8";

/// Job lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Manifest fetched and stored; segments not parsed/fetched yet.
    ReadyToDownload,
    Downloading,
    Downloaded,
    Failed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::ReadyToDownload => "READY_TO_DOWNLOAD",
            JobStatus::Downloading => "DOWNLOADING",
            JobStatus::Downloaded => "DOWNLOADED",
            JobStatus::Failed => "FAILED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Downloaded | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Mutable part of a job record. Store mutators only ever see this, so the
/// id, source URL and storage location stay write-once.
///
/// Transitions are methods rather than public fields so that
/// `total_segments == segments.len()` and the prefix-count rules for
/// `downloaded_segments` cannot be broken by a caller. Every transition is a
/// no-op once the job is terminal.
#[derive(Debug, Clone)]
pub struct JobState {
    status: JobStatus,
    segments: Vec<String>,
    downloaded_segments: usize,
    failure: Option<JobFailure>,
}

impl Default for JobState {
    fn default() -> Self {
        Self {
            status: JobStatus::ReadyToDownload,
            segments: Vec::new(),
            downloaded_segments: 0,
            failure: None,
        }
    }
}

impl JobState {
    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn total_segments(&self) -> usize {
        self.segments.len()
    }

    pub fn downloaded_segments(&self) -> usize {
        self.downloaded_segments
    }

    pub fn failure(&self) -> Option<&JobFailure> {
        self.failure.as_ref()
    }

    /// Records the parsed segment list. Only allowed before downloading starts.
    pub fn record_segments(&mut self, segments: Vec<String>) -> bool {
        if self.status != JobStatus::ReadyToDownload {
            return false;
        }
        self.segments = segments;
        self.downloaded_segments = 0;
        true
    }

    /// `ReadyToDownload` -> `Downloading`.
    pub fn begin_download(&mut self) -> bool {
        if self.status != JobStatus::ReadyToDownload {
            return false;
        }
        self.status = JobStatus::Downloading;
        true
    }

    /// Marks segment `index` persisted. Only the next segment of the prefix is
    /// accepted, so the count never skips ahead or goes backwards.
    pub fn mark_segment_done(&mut self, index: usize) -> bool {
        if self.status != JobStatus::Downloading
            || index != self.downloaded_segments
            || index >= self.segments.len()
        {
            return false;
        }
        self.downloaded_segments = index + 1;
        true
    }

    /// `Downloading` -> `Downloaded`, only once every segment is persisted.
    pub fn complete(&mut self) -> bool {
        if self.status != JobStatus::Downloading || self.downloaded_segments != self.segments.len() {
            return false;
        }
        self.status = JobStatus::Downloaded;
        true
    }

    /// Any non-terminal state -> `Failed`. Keeps the downloaded prefix count.
    pub fn fail(&mut self, failure: JobFailure) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = JobStatus::Failed;
        self.failure = Some(failure);
        true
    }
}

/// Read-only copy of a job, as returned to callers and serialized for output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSnapshot {
    pub id: JobId,
    pub source_url: String,
    pub status: JobStatus,
    pub total_segments: usize,
    pub downloaded_segments: usize,
    pub segments: Vec<String>,
    pub storage_location: PathBuf,
    pub source_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<JobFailure>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl JobSnapshot {
    /// Path of the persisted manifest copy.
    pub fn manifest_path(&self) -> PathBuf {
        self.storage_location.join(&self.source_file)
    }
}
