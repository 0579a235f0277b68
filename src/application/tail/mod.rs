//! Tail Use Case
//!
//! Coordinates the position tracker, window reader and pattern extractor
//! for every tailed file, and hands matched entries to an `EntrySink`.
//!
//! One call to `TailUseCase::on_file_ready` runs
//! `(compute window, extract, emit, advance)` cycles for a path until the
//! file is consumed. Callers must not run two cycles for the same path at
//! once; the watch loop guarantees this by processing paths one at a time.

mod use_case;


pub use use_case::{CycleReport, TailOptions, TailStats, TailUseCase, WindowOutcome};
