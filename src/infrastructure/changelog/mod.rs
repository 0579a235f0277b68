//! Changelog output: markdown formatting, atomic file writes, and the
//! deduplicating emitter that ties them to the ledger.

pub mod formatter;
mod emitter;
mod writer;

pub use emitter::{ChangelogEmitter, EmitOutcome, EmitRecord, EmitStats};
pub use writer::ChangelogWriter;
