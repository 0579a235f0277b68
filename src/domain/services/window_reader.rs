//! Window Reader Domain Service
//!
//! Decides which byte range of a growing file to (re-)read in one cycle.
//!
//! - Origin is `last_position - overlap`, or `pending_start - overlap` when a
//!   marker is pending, so markers straddling the previous read end are seen
//!   whole.
//! - The window runs to the current size, capped at `max_read_bytes`.
//! - A file that did not grow (or shrank) yields no window.

use std::path::Path;

use tracing::{debug, warn};

use crate::domain::entities::{FileCursor, ReadWindow};
use crate::domain::ports::{FileSource, FsResult};

/// Size bounds for a read window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowLimits {
    /// Upper bound on bytes read per cycle
    pub max_read_bytes: u64,
    /// Bytes re-read before the previous position
    pub overlap_bytes: u64,
}

impl Default for WindowLimits {
    fn default() -> Self {
        Self {
            max_read_bytes: 5 * 1024 * 1024,
            overlap_bytes: 2048,
        }
    }
}

/// Computes and reads the per-cycle window
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowReader {
    limits: WindowLimits,
}

impl WindowReader {
    pub fn new(limits: WindowLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> WindowLimits {
        self.limits
    }

    /// Read this cycle's window for `path`.
    ///
    /// Returns `Ok(None)` when the file has not grown past the cursor. On a
    /// successful read the cursor's pending offset is cleared (the window now
    /// covers it; the caller re-sets it if it is still unresolved). On error
    /// the cursor is untouched. Advancing is left to the caller.
    pub fn compute_window<S: FileSource + ?Sized>(
        &self,
        source: &S,
        path: &Path,
        cursor: &mut FileCursor,
    ) -> FsResult<Option<ReadWindow>> {
        let size = source.size(path)?;
        let last = cursor.last_position();
        if size <= last {
            return Ok(None);
        }

        let origin = self.origin(path, cursor);
        let end = size.min(origin.saturating_add(self.limits.max_read_bytes));
        let bytes = source.read_range(path, origin, end - origin)?;
        let truncated = origin + (bytes.len() as u64) < size;

        debug!(
            path = %path.display(),
            origin,
            prior = last,
            size,
            read = bytes.len(),
            truncated,
            "read window"
        );

        cursor.clear_pending();
        Ok(Some(ReadWindow::new(bytes, origin, last, truncated)))
    }

    fn origin(&self, path: &Path, cursor: &FileCursor) -> u64 {
        let last = cursor.last_position();
        let overlap_origin = last.saturating_sub(self.limits.overlap_bytes);
        let Some(pending) = cursor.pending_start() else {
            return overlap_origin;
        };

        let pending_origin = pending
            .saturating_sub(self.limits.overlap_bytes)
            .min(overlap_origin);
        if pending_origin.saturating_add(self.limits.max_read_bytes) <= last {
            // A capped window from this far back would never pass the cursor.
            warn!(
                path = %path.display(),
                pending,
                last,
                "pending marker is beyond the read cap; abandoning it"
            );
            return overlap_origin;
        }
        pending_origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::fs::MemorySource;

    fn reader(max: u64, overlap: u64) -> WindowReader {
        WindowReader::new(WindowLimits {
            max_read_bytes: max,
            overlap_bytes: overlap,
        })
    }

    #[test]
    fn no_growth_returns_none_and_keeps_cursor() {
        let source = MemorySource::new();
        let path = Path::new("h.json");
        source.append(path, b"abcdef");
        let mut cursor = FileCursor::at(6);
        cursor.set_pending(2);
        let before = cursor;

        let reader = reader(100, 4);
        assert!(reader.compute_window(&source, path, &mut cursor).unwrap().is_none());
        assert!(reader.compute_window(&source, path, &mut cursor).unwrap().is_none());
        assert_eq!(cursor, before);
    }

    #[test]
    fn shrink_is_treated_as_no_new_content() {
        let source = MemorySource::new();
        let path = Path::new("h.json");
        source.append(path, b"abc");
        let mut cursor = FileCursor::at(50);

        let window = reader(100, 4)
            .compute_window(&source, path, &mut cursor)
            .unwrap();
        assert!(window.is_none());
        assert_eq!(cursor.last_position(), 50);
    }

    #[test]
    fn window_reaches_back_by_overlap() {
        let source = MemorySource::new();
        let path = Path::new("h.json");
        source.append(path, b"0123456789ABCDEF");
        let mut cursor = FileCursor::at(10);

        let window = reader(100, 4)
            .compute_window(&source, path, &mut cursor)
            .unwrap()
            .unwrap();
        assert_eq!(window.read_start(), 6);
        assert_eq!(window.prior_position(), 10);
        assert_eq!(window.bytes(), b"6789ABCDEF");
        assert_eq!(window.end(), 16);
        assert!(!window.is_truncated());
    }

    #[test]
    fn overlap_clamps_at_file_start() {
        let source = MemorySource::new();
        let path = Path::new("h.json");
        source.append(path, b"0123456789");
        let mut cursor = FileCursor::at(2);

        let window = reader(100, 8)
            .compute_window(&source, path, &mut cursor)
            .unwrap()
            .unwrap();
        assert_eq!(window.read_start(), 0);
        assert_eq!(window.bytes(), b"0123456789");
    }

    #[test]
    fn pending_offset_pulls_window_back_and_is_cleared() {
        let source = MemorySource::new();
        let path = Path::new("h.json");
        source.append(path, b"0123456789ABCDEFGHIJ");
        let mut cursor = FileCursor::at(16);
        cursor.set_pending(5);

        let window = reader(100, 2)
            .compute_window(&source, path, &mut cursor)
            .unwrap()
            .unwrap();
        assert_eq!(window.read_start(), 3);
        assert_eq!(window.bytes(), b"3456789ABCDEFGHIJ");
        assert_eq!(cursor.pending_start(), None);
        // advancing is the caller's job
        assert_eq!(cursor.last_position(), 16);
    }

    #[test]
    fn pending_beyond_cap_is_abandoned() {
        let source = MemorySource::new();
        let path = Path::new("h.json");
        source.append(path, &[b'x'; 64]);
        let mut cursor = FileCursor::at(60);
        cursor.set_pending(4);

        let window = reader(16, 4)
            .compute_window(&source, path, &mut cursor)
            .unwrap()
            .unwrap();
        assert_eq!(window.read_start(), 56);
        assert_eq!(window.end(), 64);
    }

    #[test]
    fn cap_truncates_window() {
        let source = MemorySource::new();
        let path = Path::new("h.json");
        source.append(path, &[b'y'; 100]);
        let mut cursor = FileCursor::at(10);

        let window = reader(32, 4)
            .compute_window(&source, path, &mut cursor)
            .unwrap()
            .unwrap();
        assert_eq!(window.read_start(), 6);
        assert_eq!(window.len(), 32);
        assert_eq!(window.end(), 38);
        assert!(window.is_truncated());
    }

    #[test]
    fn read_failure_leaves_cursor_untouched() {
        let source = MemorySource::new();
        let path = Path::new("h.json");
        source.append(path, b"0123456789");
        source.fail_reads(path);
        let mut cursor = FileCursor::at(4);
        cursor.set_pending(1);
        let before = cursor;

        assert!(reader(100, 2)
            .compute_window(&source, path, &mut cursor)
            .is_err());
        assert_eq!(cursor, before);
    }

    #[test]
    fn stat_failure_is_an_error() {
        let source = MemorySource::new();
        let mut cursor = FileCursor::at(0);
        assert!(reader(100, 2)
            .compute_window(&source, Path::new("gone.json"), &mut cursor)
            .is_err());
    }
}
