//! Changelog emitter
//!
//! The `EntrySink` used by `watch`: deduplicates against the processed-id
//! ledger, drops skipped modes, and writes one changelog per new entry.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{error, info};

use super::ChangelogWriter;
use crate::domain::entities::MatchedEntry;
use crate::domain::ports::EntrySink;
use crate::domain::value_objects::Mode;
use crate::infrastructure::ledger::ProcessedLedger;

/// What happened to one offered entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitOutcome {
    Created(PathBuf),
    Duplicate,
    ModeSkipped,
    Failed(String),
}

/// An outcome tagged with its subtask id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitRecord {
    pub id: String,
    pub mode: Mode,
    pub outcome: EmitOutcome,
}

/// Session counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmitStats {
    pub changelogs_created: usize,
    pub duplicates_skipped: usize,
    pub mode_skipped: usize,
    pub errors: usize,
}

pub struct ChangelogEmitter {
    writer: ChangelogWriter,
    ledger: ProcessedLedger,
    skip_modes: Vec<Mode>,
    stats: EmitStats,
    records: Vec<EmitRecord>,
}

impl ChangelogEmitter {
    pub fn new(writer: ChangelogWriter, ledger: ProcessedLedger, skip_modes: Vec<Mode>) -> Self {
        Self {
            writer,
            ledger,
            skip_modes,
            stats: EmitStats::default(),
            records: Vec::new(),
        }
    }

    pub fn stats(&self) -> EmitStats {
        self.stats
    }

    pub fn ledger(&self) -> &ProcessedLedger {
        &self.ledger
    }

    pub fn writer(&self) -> &ChangelogWriter {
        &self.writer
    }

    /// Outcomes recorded since the last drain, in emission order
    pub fn drain_records(&mut self) -> Vec<EmitRecord> {
        std::mem::take(&mut self.records)
    }

    fn handle(&mut self, entry: &MatchedEntry) -> EmitOutcome {
        if self.ledger.contains(&entry.id) {
            info!(id = %entry.id, "skipping duplicate subtask");
            self.stats.duplicates_skipped += 1;
            return EmitOutcome::Duplicate;
        }

        if self.skip_modes.contains(&entry.mode) {
            info!(id = %entry.id, mode = %entry.mode, "skipping subtask by mode");
            // remembered so a later re-read does not count it again
            self.ledger.mark(&entry.id);
            self.stats.mode_skipped += 1;
            return EmitOutcome::ModeSkipped;
        }

        match self.writer.write(entry) {
            Ok(path) => {
                self.ledger.mark(&entry.id);
                self.stats.changelogs_created += 1;
                EmitOutcome::Created(path)
            }
            Err(e) => {
                error!(id = %entry.id, error = %e, "failed to write changelog");
                self.stats.errors += 1;
                EmitOutcome::Failed(e.to_string())
            }
        }
    }
}

impl EntrySink for ChangelogEmitter {
    fn emit(&mut self, entry: &MatchedEntry) -> bool {
        let outcome = self.handle(entry);
        let accepted = matches!(outcome, EmitOutcome::Created(_));
        self.records.push(EmitRecord {
            id: entry.id.clone(),
            mode: entry.mode,
            outcome,
        });
        accepted
    }
}
