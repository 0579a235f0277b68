//! Domain Layer
//!
//! The tailing core: cursor state, read windows, marker grammar and the
//! services that turn a growing file into matched subtask entries.
//!
//! ## Structure
//!
//! - `entities/` - FileCursor, ReadWindow, MatchedEntry
//! - `value_objects/` - Mode and the marker grammar
//! - `services/` - PositionTracker, WindowReader, PatternExtractor
//! - `ports/` - FileSource and EntrySink, implemented by infrastructure
//!
//! Services never open files themselves; every byte goes through the
//! `FileSource` port so the whole core runs against in-memory sources in tests.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
