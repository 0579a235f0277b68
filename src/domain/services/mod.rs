//! Domain Services
//!
//! The three pieces of the tailing engine. They reach files only through
//! the `FileSource` port.

mod extractor;
mod position_tracker;
mod window_reader;

pub use extractor::{
    Extraction, PatternExtractor, Unmatched, UnmatchedReason, DEFAULT_HISTORY_CHUNK_BYTES,
};
pub use position_tracker::PositionTracker;
pub use window_reader::{WindowLimits, WindowReader};
