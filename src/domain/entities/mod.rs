//! Domain Entities
//!
//! - `FileCursor` - per-file read position and pending offset
//! - `ReadWindow` - bytes read in one processing cycle
//! - `MatchedEntry` - an instruction/result pair ready for the emitter

mod cursor;
mod entry;
mod window;

pub use cursor::FileCursor;
pub use entry::MatchedEntry;
pub use window::ReadWindow;
