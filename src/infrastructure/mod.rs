//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - `FileSource` over the local disk, atomic writes
//! - `ledger` - processed-id log with rotation
//! - `changelog/` - markdown formatter, writer, and the changelog `EntrySink`

pub mod changelog;
pub mod fs;
pub mod ledger;

// Re-export for convenience
pub use changelog::{ChangelogEmitter, ChangelogWriter, EmitStats};
pub use fs::LocalFs;
pub use ledger::{ProcessedLedger, RotationPolicy};
