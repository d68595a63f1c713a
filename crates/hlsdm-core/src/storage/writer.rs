//! Sequential writer for one temp file, finalized by rename.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::temp_path;

/// Writes `<final>.part`; `finalize` syncs and renames it to `<final>`.
/// Dropping the writer without finalizing removes the temp file, so a failed
/// transfer leaves no partial segment behind.
pub struct SegmentWriter {
    file: Option<BufWriter<File>>,
    temp_path: PathBuf,
    final_path: PathBuf,
}

impl SegmentWriter {
    /// Create (or truncate) the temp file for `final_path`.
    pub fn create(final_path: &Path) -> io::Result<Self> {
        let temp_path = temp_path(final_path);
        let file = File::create(&temp_path)?;
        Ok(Self {
            file: Some(BufWriter::new(file)),
            temp_path,
            final_path: final_path.to_path_buf(),
        })
    }

    /// Flush, sync to disk and atomically rename to the final path.
    pub fn finalize(mut self) -> io::Result<PathBuf> {
        let Some(buf) = self.file.take() else {
            return Err(io::Error::new(io::ErrorKind::Other, "writer already closed"));
        };
        let result = buf
            .into_inner()
            .map_err(|e| e.into_error())
            .and_then(|file| file.sync_all())
            .and_then(|()| std::fs::rename(&self.temp_path, &self.final_path));
        if let Err(e) = result {
            let _ = std::fs::remove_file(&self.temp_path);
            return Err(e);
        }
        Ok(self.final_path.clone())
    }
}

impl Write for SegmentWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "writer already closed"))?;
        file.write(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for SegmentWriter {
    fn drop(&mut self) {
        if let Some(buf) = self.file.take() {
            drop(buf);
            if let Err(e) = std::fs::remove_file(&self.temp_path) {
                tracing::debug!(path = %self.temp_path.display(), "temp file cleanup failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_renames_temp_to_final() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("0.ts");
        let mut w = SegmentWriter::create(&final_path).unwrap();
        assert!(w.temp_path.exists());
        assert!(!final_path.exists());
        w.write_all(b"hello ").unwrap();
        w.write_all(b"world").unwrap();
        let tp = w.temp_path.clone();
        let out = w.finalize().unwrap();
        assert_eq!(out, final_path);
        assert!(!tp.exists());
        assert_eq!(std::fs::read(&final_path).unwrap(), b"hello world");
    }

    #[test]
    fn dropped_writer_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("1.ts");
        let mut w = SegmentWriter::create(&final_path).unwrap();
        w.write_all(b"partial").unwrap();
        let tp = w.temp_path.clone();
        drop(w);
        assert!(!tp.exists());
        assert!(!final_path.exists());
    }

    #[test]
    fn finalize_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("2.ts");
        std::fs::write(&final_path, b"old").unwrap();
        let mut w = SegmentWriter::create(&final_path).unwrap();
        w.write_all(b"new").unwrap();
        w.finalize().unwrap();
        assert_eq!(std::fs::read(&final_path).unwrap(), b"new");
    }

    #[test]
    fn create_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("missing").join("0.ts");
        assert!(SegmentWriter::create(&final_path).is_err());
    }
}
