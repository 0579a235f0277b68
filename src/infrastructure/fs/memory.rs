//! In-memory FileSource for tests
//!
//! Uses `Arc<Mutex<>>` internally so a test can keep a clone and append to
//! files while the use case under test owns another clone.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::domain::ports::{FileSource, FsError, FsResult};

#[derive(Clone, Default)]
pub struct MemorySource {
    files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    failing: Arc<Mutex<HashSet<PathBuf>>>,
    reads: Arc<Mutex<Vec<(PathBuf, u64, u64)>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes, creating the file if needed
    pub fn append(&self, path: &Path, bytes: &[u8]) {
        let mut files = self.files.lock().unwrap();
        files
            .entry(path.to_path_buf())
            .or_default()
            .extend_from_slice(bytes);
    }

    /// Replace the file's content
    pub fn set(&self, path: &Path, bytes: &[u8]) {
        let mut files = self.files.lock().unwrap();
        files.insert(path.to_path_buf(), bytes.to_vec());
    }

    /// Current length of `path`, 0 if absent
    pub fn size_of(&self, path: &Path) -> u64 {
        let files = self.files.lock().unwrap();
        files.get(path).map_or(0, |bytes| bytes.len() as u64)
    }

    /// Make reads (not size queries) of `path` fail
    pub fn fail_reads(&self, path: &Path) {
        self.failing.lock().unwrap().insert(path.to_path_buf());
    }

    pub fn heal(&self, path: &Path) {
        self.failing.lock().unwrap().remove(path);
    }

    /// Every `(path, offset, len)` read so far
    pub fn reads(&self) -> Vec<(PathBuf, u64, u64)> {
        self.reads.lock().unwrap().clone()
    }

    pub fn clear_reads(&self) {
        self.reads.lock().unwrap().clear();
    }
}

impl FileSource for MemorySource {
    fn size(&self, path: &Path) -> FsResult<u64> {
        let files = self.files.lock().unwrap();
        files
            .get(path)
            .map(|bytes| bytes.len() as u64)
            .ok_or_else(|| FsError::NotFound(path.to_path_buf()))
    }

    fn read_range(&self, path: &Path, offset: u64, len: u64) -> FsResult<Vec<u8>> {
        if self.failing.lock().unwrap().contains(path) {
            return Err(FsError::Io(
                path.to_path_buf(),
                std::io::Error::other("injected read failure"),
            ));
        }
        self.reads
            .lock()
            .unwrap()
            .push((path.to_path_buf(), offset, len));

        let files = self.files.lock().unwrap();
        let bytes = files
            .get(path)
            .ok_or_else(|| FsError::NotFound(path.to_path_buf()))?;
        let start = (offset as usize).min(bytes.len());
        let end = start.saturating_add(len as usize).min(bytes.len());
        Ok(bytes[start..end].to_vec())
    }
}
