//! Job-level errors and their serializable kind.
//!
//! Every failure the orchestrator can hit maps to one `JobError` variant;
//! `FailureKind` is the stable, serializable tag stored on a failed job so
//! pollers can tell failures apart without string matching.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::job_store::JobId;
use crate::locator::MalformedBaseUrl;
use crate::playlist::PlaylistError;
use crate::retry::FetchError;

/// Why a job could not be created, driven, or looked up.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// Manifest or segment unreachable, or answered with a non-2xx status.
    #[error("cannot fetch {url}: {source}")]
    UnreadableSource {
        url: String,
        #[source]
        source: FetchError,
    },
    /// Manifest could not be parsed (unsupported version, malformed tag, unreadable bytes).
    #[error(transparent)]
    Playlist(#[from] PlaylistError),
    /// Manifest URL cannot serve as a base for relative segment references.
    #[error(transparent)]
    MalformedBaseUrl(#[from] MalformedBaseUrl),
    /// Writing the manifest copy or a segment file failed.
    #[error("storage write failed for {}: {source}", .path.display())]
    StorageWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// No job with this id in the store.
    #[error("job {0} not found")]
    NotFound(JobId),
    /// The job's orchestration loop was cancelled between segments.
    #[error("job {0} cancelled")]
    Cancelled(JobId),
    /// The blocking task running the job ended without reporting (runtime shutdown).
    #[error("job task interrupted before finishing")]
    Interrupted,
}

impl JobError {
    pub fn kind(&self) -> FailureKind {
        match self {
            JobError::UnreadableSource { .. } => FailureKind::UnreadableSource,
            JobError::Playlist(PlaylistError::UnsupportedVersion { .. }) => {
                FailureKind::UnsupportedVersion
            }
            JobError::Playlist(PlaylistError::MalformedTag { .. }) => FailureKind::MalformedTag,
            JobError::Playlist(PlaylistError::UnreadableInput(_)) => FailureKind::UnreadableInput,
            JobError::MalformedBaseUrl(_) => FailureKind::MalformedBaseUrl,
            JobError::StorageWriteFailure { .. } => FailureKind::StorageWriteFailure,
            JobError::NotFound(_) => FailureKind::NotFound,
            JobError::Cancelled(_) => FailureKind::Cancelled,
            JobError::Interrupted => FailureKind::Interrupted,
        }
    }

    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        JobError::StorageWriteFailure {
            path: path.into(),
            source,
        }
    }
}

/// Serializable failure tag recorded on a `Failed` job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    UnreadableSource,
    UnsupportedVersion,
    MalformedTag,
    UnreadableInput,
    MalformedBaseUrl,
    StorageWriteFailure,
    NotFound,
    Cancelled,
    Interrupted,
}

/// Failure details stored on a job: kind plus the rendered error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&JobError> for JobFailure {
    fn from(e: &JobError) -> Self {
        JobFailure {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_variants() {
        let e = JobError::from(PlaylistError::UnsupportedVersion {
            line_number: 1,
            line: "#EXT-X-VERSION:4".into(),
        });
        assert_eq!(e.kind(), FailureKind::UnsupportedVersion);

        let e = JobError::UnreadableSource {
            url: "https://example.com/x.m3u8".into(),
            source: FetchError::Http(404),
        };
        assert_eq!(e.kind(), FailureKind::UnreadableSource);
        assert_eq!(e.to_string(), "cannot fetch https://example.com/x.m3u8: HTTP 404");
    }

    #[test]
    fn failure_from_error_keeps_message() {
        let id = uuid::Uuid::nil();
        let e = JobError::Cancelled(id);
        let f = JobFailure::from(&e);
        assert_eq!(f.kind, FailureKind::Cancelled);
        assert_eq!(f.message, format!("job {} cancelled", id));
    }
}
