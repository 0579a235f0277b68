//! Pattern Extractor Domain Service
//!
//! Scans a read window for completion markers and pairs each one with the
//! nearest preceding start marker.
//!
//! ## Per completion
//!
//! 1. Find the completion terminator after the marker. Missing means the
//!    result is still being written: skip it and report it as pending.
//! 2. Skip completions whose terminator ended at or before the window's
//!    prior position; an earlier window already handled them.
//! 3. Find the closest start marker before the completion inside the
//!    window, or failing that, in the file history before the completion
//!    (read backwards in bounded chunks, never past the completion).
//! 4. The start marker's own terminator must sit between the start marker
//!    and the completion, otherwise the pair is malformed and dropped.
//!
//! A failure to resolve one completion never stops the others.

use std::borrow::Cow;
use std::path::Path;

use tracing::{debug, warn};

use crate::domain::entities::{MatchedEntry, ReadWindow};
use crate::domain::ports::{FileSource, FsError};
use crate::domain::value_objects::markers::{
    completion_pattern, completion_terminator, longest_start_marker, start_pattern,
    start_terminator, COMPLETION_TERMINATOR, START_TERMINATOR,
};
use crate::domain::value_objects::Mode;

/// Default chunk size for backward history searches
pub const DEFAULT_HISTORY_CHUNK_BYTES: u64 = 1024 * 1024;

/// Outcome of scanning one window
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// New entries, in file order
    pub entries: Vec<MatchedEntry>,
    /// Earliest absolute offset that could not be resolved yet
    pub pending: Option<u64>,
    /// Completions whose terminator was found but no valid start marker
    pub unmatched: Vec<Unmatched>,
    /// Completions skipped because an earlier window already covered them
    pub already_seen: usize,
}

/// A completion that could not be paired
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unmatched {
    pub id: String,
    pub reason: UnmatchedReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmatchedReason {
    /// No start marker anywhere before the completion
    NoStartMarker,
    /// Start marker found, but its terminator is missing or after the completion
    MalformedOrdering,
    /// History lookup failed on I/O
    HistoryUnreadable,
}

impl std::fmt::Display for UnmatchedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnmatchedReason::NoStartMarker => write!(f, "no start marker"),
            UnmatchedReason::MalformedOrdering => write!(f, "malformed marker ordering"),
            UnmatchedReason::HistoryUnreadable => write!(f, "history unreadable"),
        }
    }
}

/// Start marker hit within a buffer
#[derive(Debug, Clone, Copy)]
struct StartHit {
    /// Offset of the marker's first byte
    pos: usize,
    /// Offset just past the marker (payload start)
    payload: usize,
    mode: Mode,
}

/// Pairs completion markers with their instructions
#[derive(Debug, Clone, Copy)]
pub struct PatternExtractor {
    history_chunk_bytes: u64,
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CHUNK_BYTES)
    }
}

impl PatternExtractor {
    pub fn new(history_chunk_bytes: u64) -> Self {
        Self {
            history_chunk_bytes: history_chunk_bytes.max(longest_start_marker() as u64),
        }
    }

    /// Extract using only the window's own bytes
    pub fn extract(&self, window: &ReadWindow) -> Extraction {
        self.run(window, None)
    }

    /// Extract, falling back to the file history for start markers that
    /// precede the window
    pub fn extract_with_history<S: FileSource>(
        &self,
        window: &ReadWindow,
        source: &S,
        path: &Path,
    ) -> Extraction {
        self.run(window, Some((source as &dyn FileSource, path)))
    }

    fn run(&self, window: &ReadWindow, history: Option<(&dyn FileSource, &Path)>) -> Extraction {
        let bytes = window.bytes();
        let mut out = Extraction::default();
        // start of the latest completion that has its terminator
        let mut last_terminated: Option<usize> = None;

        for caps in completion_pattern().captures_iter(bytes) {
            let (Some(marker), Some(id)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let id = String::from_utf8_lossy(id.as_bytes()).into_owned();
            let payload_start = marker.end();

            let Some(rel) = completion_terminator().find(&bytes[payload_start..]) else {
                // No terminator after this one means none after any later one either.
                debug!(id = %id, offset = window.absolute(marker.start()), "result not terminated yet");
                out.pending = Some(window.absolute(marker.start()));
                break;
            };
            let terminator = payload_start + rel;
            last_terminated = Some(marker.start());

            let terminator_end = window.absolute(terminator + COMPLETION_TERMINATOR.len());
            if terminator_end <= window.prior_position() {
                out.already_seen += 1;
                continue;
            }

            let resolved = match nearest_start(bytes, marker.start()) {
                Some(hit) => payload_before(bytes, hit, marker.start())
                    .map(|payload| (hit.mode, payload.into_owned())),
                None => match history {
                    Some((source, path)) => {
                        self.lookup_history(source, path, window.absolute(marker.start()))
                    }
                    None => Err(UnmatchedReason::NoStartMarker),
                },
            };

            match resolved {
                Ok((mode, start_payload)) => {
                    debug!(id = %id, mode = %mode, "matched subtask");
                    out.entries.push(MatchedEntry {
                        id,
                        mode,
                        start_payload,
                        end_payload: lossy(&bytes[payload_start..terminator]),
                        terminator_offset: window.absolute(terminator),
                    });
                }
                Err(reason) => {
                    warn!(id = %id, %reason, "completion without usable instruction; dropping");
                    out.unmatched.push(Unmatched { id, reason });
                }
            }
        }

        if let Some(start) = last_start(bytes) {
            let answered = last_terminated.is_some_and(|completion| completion > start);
            if !answered {
                let offset = window.absolute(start);
                out.pending = Some(out.pending.map_or(offset, |p| p.min(offset)));
            }
        }

        out
    }

    /// Search the file backwards from `before` for the nearest start marker
    fn lookup_history(
        &self,
        source: &dyn FileSource,
        path: &Path,
        before: u64,
    ) -> Result<(Mode, String), UnmatchedReason> {
        let spill = longest_start_marker() as u64 - 1;
        let mut end = before;

        while end > 0 {
            let start = end.saturating_sub(self.history_chunk_bytes);
            let stop = end.saturating_add(spill).min(before);
            let chunk = source
                .read_range(path, start, stop - start)
                .map_err(history_error)?;

            if let Some(hit) = nearest_start(&chunk, chunk.len()) {
                let payload_at = start + hit.payload as u64;
                debug!(
                    path = %path.display(),
                    marker = start + hit.pos as u64,
                    "start marker found in history"
                );
                let payload = self.history_payload(source, path, payload_at, before)?;
                return Ok((hit.mode, payload));
            }

            end = start;
        }

        Err(UnmatchedReason::NoStartMarker)
    }

    /// Read forward from `payload_at` in bounded chunks until the start
    /// terminator; it must end before `before`
    fn history_payload(
        &self,
        source: &dyn FileSource,
        path: &Path,
        payload_at: u64,
        before: u64,
    ) -> Result<String, UnmatchedReason> {
        let spill = START_TERMINATOR.len() - 1;
        let mut payload = Vec::new();
        let mut pos = payload_at;

        while pos < before {
            let stop = pos.saturating_add(self.history_chunk_bytes).min(before);
            let chunk = source
                .read_range(path, pos, stop - pos)
                .map_err(history_error)?;
            if chunk.is_empty() {
                break;
            }
            pos += chunk.len() as u64;

            let scan_from = payload.len().saturating_sub(spill);
            payload.extend_from_slice(&chunk);
            if let Some(rel) = start_terminator().find(&payload[scan_from..]) {
                payload.truncate(scan_from + rel);
                return Ok(lossy(&payload));
            }
        }

        Err(UnmatchedReason::MalformedOrdering)
    }
}

fn history_error(err: FsError) -> UnmatchedReason {
    warn!(error = %err, "history lookup failed");
    UnmatchedReason::HistoryUnreadable
}

/// Closest start marker lying entirely before `before`
fn nearest_start(bytes: &[u8], before: usize) -> Option<StartHit> {
    let haystack = &bytes[..before.min(bytes.len())];
    start_pattern()
        .captures_iter(haystack)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let mode = Mode::from_marker_bytes(caps.get(1)?.as_bytes())?;
            Some(StartHit {
                pos: whole.start(),
                payload: whole.end(),
                mode,
            })
        })
        .last()
}

/// Offset of the last start marker anywhere in the buffer
fn last_start(bytes: &[u8]) -> Option<usize> {
    start_pattern().find_iter(bytes).last().map(|m| m.start())
}

/// Instruction payload of `hit`, terminated before `limit`
fn payload_before(bytes: &[u8], hit: StartHit, limit: usize) -> Result<Cow<'_, str>, UnmatchedReason> {
    let region = &bytes[hit.payload..limit];
    start_terminator()
        .find(region)
        .map(|rel| String::from_utf8_lossy(&region[..rel]))
        .ok_or(UnmatchedReason::MalformedOrdering)
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
