//! Position Tracker Domain Service
//!
//! Holds one `FileCursor` per tailed path. A path is baselined at its size on
//! first observation, so history written before the tracker saw the file is
//! never processed. Cursors live for the whole process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::entities::FileCursor;
use crate::domain::ports::{FileSource, FsResult};

/// Per-path cursor registry
#[derive(Debug, Default)]
pub struct PositionTracker {
    cursors: HashMap<PathBuf, FileCursor>,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Baseline an untracked path at its current size.
    ///
    /// Returns `Ok(true)` if the path was newly tracked, `Ok(false)` if it
    /// already was. A failed size query leaves the tracker unchanged.
    pub fn initialize<S: FileSource + ?Sized>(&mut self, source: &S, path: &Path) -> FsResult<bool> {
        if self.is_tracked(path) {
            return Ok(false);
        }
        let size = source.size(path)?;
        self.cursors.insert(path.to_path_buf(), FileCursor::at(size));
        Ok(true)
    }

    /// Track a path from an explicit offset (one-shot scans start at 0)
    pub fn initialize_at(&mut self, path: &Path, baseline: u64) -> bool {
        if self.is_tracked(path) {
            return false;
        }
        self.cursors
            .insert(path.to_path_buf(), FileCursor::at(baseline));
        true
    }

    pub fn is_tracked(&self, path: &Path) -> bool {
        self.cursors.contains_key(path)
    }

    pub fn cursor(&self, path: &Path) -> Option<FileCursor> {
        self.cursors.get(path).copied()
    }

    pub(crate) fn cursor_mut(&mut self, path: &Path) -> Option<&mut FileCursor> {
        self.cursors.get_mut(path)
    }

    /// Record an unresolved marker offset; earlier offsets win
    pub fn set_pending(&mut self, path: &Path, offset: u64) -> bool {
        self.cursors
            .get_mut(path)
            .map(|cursor| cursor.set_pending(offset))
            .unwrap_or(false)
    }

    pub fn clear_pending(&mut self, path: &Path) {
        if let Some(cursor) = self.cursors.get_mut(path) {
            cursor.clear_pending();
        }
    }

    /// Set the consumed position after a successful window read
    pub fn advance(&mut self, path: &Path, new_position: u64) {
        if let Some(cursor) = self.cursors.get_mut(path) {
            cursor.advance(new_position);
        }
    }

    /// Number of tracked paths
    pub fn tracked_count(&self) -> usize {
        self.cursors.len()
    }
}
