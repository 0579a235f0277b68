//! Watch Use Case
//!
//! Continuous watching of a tasks directory:
//! - Startup baseline of existing history files (via `ignore::WalkBuilder`)
//! - File system monitoring (via `notify` crate)
//! - Per-path debouncing
//! - One tail cycle per quiet path, emitted through the changelog sink
//!
//! ## Usage
//!
//! ```ignore
//! let use_case = WatchUseCase::new(WatchOptions::from_config(&config));
//! use_case.start(&mut tail, running, |event| println!("{}", event.to_json()))?;
//! ```

mod baseline;
mod event;
mod use_case;


pub use baseline::{discover_history_files, Discovery};
pub use event::{DebounceState, WatchEvent, WatchOptions};
pub use use_case::{process_ready, WatchUseCase};
