//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `TailUseCase` - Owns the cursors and runs read/extract/emit/advance cycles
//! - `WatchUseCase` - Startup baseline, file notifications and debouncing

pub mod tail;
pub mod watch;

pub use tail::{CycleReport, TailOptions, TailStats, TailUseCase, WindowOutcome};
pub use watch::{process_ready, WatchEvent, WatchOptions, WatchUseCase};
