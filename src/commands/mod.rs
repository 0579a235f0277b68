//! Command handlers for the subtrail binary

pub mod config;
pub mod scan;
pub mod watch;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use subtrail::config::{Config, LoadedConfig};

/// Resolve configuration for a command and surface its warnings
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let loaded = Config::resolve(explicit, &cwd)?;
    for warning in &loaded.warnings {
        warn!("{}", warning);
    }
    Ok(loaded)
}
