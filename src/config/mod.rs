//! Configuration module for subtrail
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (SUBTRAIL_*)
//! 3. `--config <path>`, else `./subtrail.toml`, else
//!    `$XDG_CONFIG_HOME/subtrail/config.toml`
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{apply_env_overrides, ConfigWarning, LoadedConfig, LOCAL_CONFIG_FILE};
pub use types::{Config, FilterConfig, LedgerConfig, OutputConfig, ReadConfig, WatchConfig};
