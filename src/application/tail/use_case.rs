//! Tail Use Case implementation

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::ports::{EntrySink, FileSource, FsResult};
use crate::domain::services::{
    Extraction, PatternExtractor, PositionTracker, WindowLimits, WindowReader,
    DEFAULT_HISTORY_CHUNK_BYTES,
};

/// Tuning for the read/extract cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailOptions {
    pub limits: WindowLimits,
    /// Chunk size for backward searches of start markers
    pub history_chunk_bytes: u64,
}

impl Default for TailOptions {
    fn default() -> Self {
        Self {
            limits: WindowLimits::default(),
            history_chunk_bytes: DEFAULT_HISTORY_CHUNK_BYTES,
        }
    }
}

/// One processed window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowOutcome {
    pub read_start: u64,
    pub end: u64,
    pub truncated: bool,
    pub extraction: Extraction,
    /// Entries the sink accepted
    pub accepted: usize,
}

/// Summary of one `on_file_ready` call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Path was unseen and has just been baselined
    pub baselined: bool,
    pub windows: usize,
    pub bytes_read: u64,
    pub entries: usize,
    pub accepted: usize,
    pub unmatched: usize,
    pub already_seen: usize,
    /// Pending offset left on the cursor afterwards
    pub pending: Option<u64>,
    /// Read failure that stopped the cycle
    pub error: Option<String>,
}

/// Session counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TailStats {
    pub files_processed: usize,
    pub subtasks_found: usize,
    pub unmatched: usize,
    pub read_errors: usize,
}

/// Top-level coordinator for tailed files
pub struct TailUseCase<S: FileSource, E: EntrySink> {
    source: S,
    sink: E,
    tracker: PositionTracker,
    reader: WindowReader,
    extractor: PatternExtractor,
    stats: TailStats,
}

impl<S: FileSource, E: EntrySink> TailUseCase<S, E> {
    pub fn new(source: S, sink: E, options: TailOptions) -> Self {
        Self {
            source,
            sink,
            tracker: PositionTracker::new(),
            reader: WindowReader::new(options.limits),
            extractor: PatternExtractor::new(options.history_chunk_bytes),
            stats: TailStats::default(),
        }
    }

    /// Baseline `path` at its current size without processing it
    pub fn initialize(&mut self, path: &Path) -> FsResult<bool> {
        let added = self.tracker.initialize(&self.source, path)?;
        if added {
            debug!(path = %path.display(), "baselined file");
        }
        Ok(added)
    }

    /// Start tracking `path` from an explicit offset
    pub fn initialize_at(&mut self, path: &Path, offset: u64) -> bool {
        self.tracker.initialize_at(path, offset)
    }

    /// Process new content of `path`.
    ///
    /// An unseen path is baselined instead. Windows are processed until the
    /// file is consumed; a read failure stops the call and leaves the
    /// cursor as the last successful window left it.
    pub fn on_file_ready(&mut self, path: &Path) -> CycleReport {
        self.stats.files_processed += 1;
        let mut report = CycleReport::default();

        if !self.tracker.is_tracked(path) {
            match self.initialize(path) {
                Ok(_) => report.baselined = true,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not baseline file");
                    self.stats.read_errors += 1;
                    report.error = Some(e.to_string());
                }
            }
            return report;
        }

        loop {
            match self.run_cycle(path) {
                Ok(Some(outcome)) => {
                    report.windows += 1;
                    report.bytes_read += outcome.end - outcome.read_start;
                    report.entries += outcome.extraction.entries.len();
                    report.accepted += outcome.accepted;
                    report.unmatched += outcome.extraction.unmatched.len();
                    report.already_seen += outcome.extraction.already_seen;
                    if !outcome.truncated {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "read failed; will retry on next change"
                    );
                    self.stats.read_errors += 1;
                    report.error = Some(e.to_string());
                    break;
                }
            }
        }

        report.pending = self
            .tracker
            .cursor(path)
            .and_then(|cursor| cursor.pending_start());
        if report.entries > 0 {
            info!(
                path = %path.display(),
                entries = report.entries,
                accepted = report.accepted,
                "processed new subtasks"
            );
        }
        report
    }

    /// Run one window cycle for a tracked path.
    ///
    /// Returns `Ok(None)` if the path is untracked or did not grow.
    pub fn run_cycle(&mut self, path: &Path) -> FsResult<Option<WindowOutcome>> {
        let Some(cursor) = self.tracker.cursor_mut(path) else {
            return Ok(None);
        };
        let Some(window) = self.reader.compute_window(&self.source, path, cursor)? else {
            return Ok(None);
        };

        let extraction = self
            .extractor
            .extract_with_history(&window, &self.source, path);

        let mut accepted = 0;
        for entry in &extraction.entries {
            if self.sink.emit(entry) {
                accepted += 1;
            }
        }

        self.tracker.advance(path, window.end());
        if let Some(offset) = extraction.pending {
            self.tracker.set_pending(path, offset);
        }

        self.stats.subtasks_found += extraction.entries.len();
        self.stats.unmatched += extraction.unmatched.len();

        Ok(Some(WindowOutcome {
            read_start: window.read_start(),
            end: window.end(),
            truncated: window.is_truncated(),
            extraction,
            accepted,
        }))
    }

    pub fn stats(&self) -> TailStats {
        self.stats
    }

    pub fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut E {
        &mut self.sink
    }

    pub fn into_sink(self) -> E {
        self.sink
    }
}
