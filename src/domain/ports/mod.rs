//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod entry_sink;
pub mod file_source;

pub use entry_sink::EntrySink;
pub use file_source::{FileSource, FsError, FsResult};
