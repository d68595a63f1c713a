//! Per-job storage location and file lifecycle.
//!
//! Layout: `<root>/<job id>/main.m3u8` plus `<i>.ts` per segment. Every file
//! is written to a `.part` sibling first, synced, and then renamed, so a
//! final name only ever appears with complete content.

mod writer;

pub use writer::SegmentWriter;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::job_store::MANIFEST_FILENAME;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Extension of stored segment files.
pub const SEGMENT_EXTENSION: &str = "ts";

/// Path for the temp file: appends `.part` to the final path (e.g. `3.ts` → `3.ts.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// One job's storage directory.
#[derive(Debug, Clone)]
pub struct JobStorage {
    dir: PathBuf,
}

impl JobStorage {
    /// Creates the directory (and parents) if missing.
    pub fn create(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Handle to an existing directory; nothing is touched on disk.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILENAME)
    }

    /// `<dir>/<index>.ts`
    pub fn segment_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.{}", index, SEGMENT_EXTENSION))
    }

    /// Stores the manifest bytes verbatim.
    pub fn write_manifest(&self, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.manifest_path();
        let mut w = SegmentWriter::create(&path)?;
        w.write_all(bytes)?;
        w.finalize()
    }

    pub fn read_manifest(&self) -> io::Result<Vec<u8>> {
        fs::read(self.manifest_path())
    }

    /// Opens the temp file for segment `index`.
    pub fn begin_segment(&self, index: usize) -> io::Result<SegmentWriter> {
        SegmentWriter::create(&self.segment_path(index))
    }

    /// Final segment files present on disk, in index order.
    pub fn stored_segments(&self) -> io::Result<Vec<usize>> {
        let mut out = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let name = entry?.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(stem) = name.strip_suffix(".ts") {
                if let Ok(i) = stem.parse::<usize>() {
                    out.push(i);
                }
            }
        }
        out.sort_unstable();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_appends_part() {
        let p = temp_path(Path::new("0.ts"));
        assert_eq!(p.to_string_lossy(), "0.ts.part");
        let p2 = temp_path(Path::new("/tmp/job/main.m3u8"));
        assert_eq!(p2.to_string_lossy(), "/tmp/job/main.m3u8.part");
    }

    #[test]
    fn layout_under_job_dir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JobStorage::create(dir.path().join("job")).unwrap();
        assert!(storage.dir().is_dir());
        assert_eq!(storage.manifest_path(), dir.path().join("job").join("main.m3u8"));
        assert_eq!(storage.segment_path(7), dir.path().join("job").join("7.ts"));
    }

    #[test]
    fn manifest_is_stored_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JobStorage::create(dir.path()).unwrap();
        let body = b"#EXTM3U\r\n#EXT-X-VERSION:3\r\n#EXTINF:10,\r\na.ts\r\n";
        let path = storage.write_manifest(body).unwrap();
        assert_eq!(path, storage.manifest_path());
        assert_eq!(storage.read_manifest().unwrap(), body);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn stored_segments_ignores_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JobStorage::create(dir.path()).unwrap();
        for i in [2usize, 0, 1] {
            let mut w = storage.begin_segment(i).unwrap();
            w.write_all(b"x").unwrap();
            w.finalize().unwrap();
        }
        let mut pending = storage.begin_segment(3).unwrap();
        pending.write_all(b"partial").unwrap();
        storage.write_manifest(b"#EXTM3U\n").unwrap();
        assert_eq!(storage.stored_segments().unwrap(), vec![0, 1, 2]);
        drop(pending);
    }
}
