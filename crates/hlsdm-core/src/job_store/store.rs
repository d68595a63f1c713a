//! `JobStore`: index of per-job records, each behind its own lock.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use super::types::{JobId, JobSnapshot, JobState, MANIFEST_FILENAME};
use crate::error::JobError;

struct JobRecord {
    id: JobId,
    source_url: String,
    storage_location: PathBuf,
    created_at: i64,
    updated_at: i64,
    /// Insertion order, for newest-first listing when timestamps tie.
    seq: u64,
    state: JobState,
}

impl JobRecord {
    fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            id: self.id,
            source_url: self.source_url.clone(),
            status: self.state.status(),
            total_segments: self.state.total_segments(),
            downloaded_segments: self.state.downloaded_segments(),
            segments: self.state.segments().to_vec(),
            storage_location: self.storage_location.clone(),
            source_file: MANIFEST_FILENAME.to_string(),
            failure: self.state.failure().cloned(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

type Entry = Arc<Mutex<JobRecord>>;

/// Process-lifetime job store. Safe to share behind an `Arc`.
pub struct JobStore {
    storage_root: PathBuf,
    jobs: RwLock<HashMap<JobId, Entry>>,
    next_seq: AtomicU64,
}

impl JobStore {
    /// New empty store; each job's storage location is `<storage_root>/<id>`.
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
            jobs: RwLock::new(HashMap::new()),
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    /// Inserts a new `ReadyToDownload` job with a fresh id and returns it.
    pub fn create(&self, source_url: &str) -> JobSnapshot {
        let now = unix_timestamp();
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let mut jobs = self.jobs.write();
        let mut id = JobId::new_v4();
        while jobs.contains_key(&id) {
            id = JobId::new_v4();
        }
        let record = JobRecord {
            id,
            source_url: source_url.to_string(),
            storage_location: self.storage_root.join(id.to_string()),
            created_at: now,
            updated_at: now,
            seq,
            state: JobState::default(),
        };
        let snapshot = record.snapshot();
        jobs.insert(id, Arc::new(Mutex::new(record)));
        tracing::debug!(job_id = %id, url = source_url, "job created");
        snapshot
    }

    /// Copy of the job as of this call.
    pub fn get(&self, id: &JobId) -> Result<JobSnapshot, JobError> {
        let entry = self.entry(id)?;
        let record = entry.lock();
        Ok(record.snapshot())
    }

    /// Runs `f` on the job's mutable state while holding that job's lock.
    ///
    /// Concurrent updates of the same job apply one after another; updates of
    /// different jobs do not wait on each other. `updated_at` is bumped after
    /// every call.
    pub fn update<R>(&self, id: &JobId, f: impl FnOnce(&mut JobState) -> R) -> Result<R, JobError> {
        let entry = self.entry(id)?;
        let mut record = entry.lock();
        let out = f(&mut record.state);
        record.updated_at = unix_timestamp();
        Ok(out)
    }

    /// All jobs, newest first.
    pub fn list(&self) -> Vec<JobSnapshot> {
        let entries: Vec<Entry> = self.jobs.read().values().cloned().collect();
        let mut rows: Vec<(u64, JobSnapshot)> = entries
            .iter()
            .map(|e| {
                let r = e.lock();
                (r.seq, r.snapshot())
            })
            .collect();
        rows.sort_by(|a, b| b.0.cmp(&a.0));
        rows.into_iter().map(|(_, s)| s).collect()
    }

    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clones the entry handle under a short read lock so the index is never
    /// held while a record is locked.
    fn entry(&self, id: &JobId) -> Result<Entry, JobError> {
        self.jobs
            .read()
            .get(id)
            .cloned()
            .ok_or(JobError::NotFound(*id))
    }
}

pub(crate) fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
