//! Tracing subscriber setup for the subtrail binary
//!
//! Priority (highest to lowest):
//!
//! 1. `SUBTRAIL_LOG` (directives, e.g. `subtrail=debug,warn`)
//! 2. `RUST_LOG`
//! 3. `-v` / `-q` flags
//! 4. `warn`
//!
//! Logs go to stderr so NDJSON on stdout stays machine-readable.

use is_terminal::IsTerminal;
use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Verbosity derived from CLI flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose(u8),
}

impl Verbosity {
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        if verbose > 0 {
            Self::Verbose(verbose)
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    pub fn default_level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose(1) => Level::INFO,
            Self::Verbose(2) => Level::DEBUG,
            Self::Verbose(_) => Level::TRACE,
        }
    }
}

/// Install the global subscriber. Call once, before loading config.
pub fn init(verbosity: Verbosity) {
    let filter = build_env_filter(
        verbosity,
        std::env::var("SUBTRAIL_LOG").ok(),
        std::env::var("RUST_LOG").ok(),
    );

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(matches!(verbosity, Verbosity::Verbose(_)));

    // try_init: a second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer.compact())
        .try_init();
}

fn build_env_filter(
    verbosity: Verbosity,
    subtrail_log: Option<String>,
    rust_log: Option<String>,
) -> EnvFilter {
    for directives in [subtrail_log, rust_log].into_iter().flatten() {
        if let Ok(filter) = EnvFilter::try_new(&directives) {
            return filter;
        }
    }
    EnvFilter::new(verbosity.default_level().as_str())
}
