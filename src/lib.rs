//! Subtrail - turns completed agent subtasks into changelog files
//!
//! Subtrail tails the conversation history files an AI coding agent keeps per
//! task. Each time a file grows it reads a bounded window of new bytes, pairs
//! every subtask completion with the instruction that started it, and hands
//! the pair to a sink (by default one markdown changelog per subtask).

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{TailOptions, TailUseCase, WatchEvent, WatchOptions, WatchUseCase};
pub use config::Config;
pub use domain::entities::{FileCursor, MatchedEntry, ReadWindow};
pub use domain::ports::{EntrySink, FileSource};
pub use domain::value_objects::Mode;
pub use error::{SubtrailError, SubtrailResult};
pub use infrastructure::{ChangelogEmitter, ChangelogWriter, LocalFs, ProcessedLedger};
