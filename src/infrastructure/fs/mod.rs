//! File System Implementations
//!
//! Concrete implementations of the FileSource port.

mod local;
#[cfg(test)]
mod memory;

pub use local::{atomic_write, LocalFs};
#[cfg(test)]
pub use memory::MemorySource;
