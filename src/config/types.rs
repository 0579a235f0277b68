//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::application::tail::TailOptions;
use crate::domain::services::{WindowLimits, DEFAULT_HISTORY_CHUNK_BYTES};
use crate::domain::value_objects::markers::completion_marker_len;
use crate::domain::value_objects::Mode;
use crate::error::{SubtrailError, SubtrailResult};
use crate::infrastructure::ledger::RotationPolicy;

use super::loader::{self, ConfigWarning, LoadedConfig};

/// Where conversation histories live and how they are watched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_tasks_path")]
    pub tasks_path: PathBuf,

    #[serde(default = "default_conversation_filename")]
    pub conversation_filename: String,

    /// Quiet period before a changed file is processed
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Only baseline files modified within this many days (0 = all)
    #[serde(default = "default_max_file_age_days")]
    pub max_file_age_days: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            tasks_path: default_tasks_path(),
            conversation_filename: default_conversation_filename(),
            debounce_ms: default_debounce_ms(),
            max_file_age_days: default_max_file_age_days(),
        }
    }
}

/// Read window sizing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadConfig {
    #[serde(default = "default_max_read_bytes")]
    pub max_read_bytes: u64,

    #[serde(default = "default_overlap_bytes")]
    pub overlap_bytes: u64,

    #[serde(default = "default_history_chunk_bytes")]
    pub history_chunk_bytes: u64,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            max_read_bytes: default_max_read_bytes(),
            overlap_bytes: default_overlap_bytes(),
            history_chunk_bytes: default_history_chunk_bytes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_changelog_dir")]
    pub changelog_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            changelog_dir: default_changelog_dir(),
        }
    }
}

/// Processed-id ledger location and rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_ledger_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,

    #[serde(default = "default_rotation_count")]
    pub rotation_count: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            dir: default_ledger_dir(),
            max_file_size_bytes: default_max_file_size_bytes(),
            rotation_count: default_rotation_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Modes recorded as processed without writing a changelog
    #[serde(default = "default_skip_modes")]
    pub skip_modes: Vec<Mode>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            skip_modes: default_skip_modes(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub read: ReadConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub ledger: LedgerConfig,

    #[serde(default)]
    pub filter: FilterConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> SubtrailResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> SubtrailResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Resolve the config file (explicit, working directory, user config),
    /// apply `SUBTRAIL_*` overrides and validate.
    pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> SubtrailResult<LoadedConfig> {
        loader::resolve(explicit, cwd)
    }

    /// Apply environment variable overrides (SUBTRAIL_* prefix)
    pub fn with_env_overrides(self) -> SubtrailResult<Self> {
        loader::apply_env_overrides(self, |key| std::env::var(key).ok())
    }

    /// Check value ranges and cross-field constraints
    pub fn validate(&self) -> SubtrailResult<()> {
        if self.read.max_read_bytes == 0 {
            return Err(invalid("read.max_read_bytes", "must be greater than 0"));
        }
        if self.read.overlap_bytes == 0 {
            return Err(invalid("read.overlap_bytes", "must be greater than 0"));
        }
        if self.read.overlap_bytes < completion_marker_len() as u64 {
            return Err(invalid(
                "read.overlap_bytes",
                &format!(
                    "must be at least the completion marker length ({} bytes)",
                    completion_marker_len()
                ),
            ));
        }
        if self.read.overlap_bytes >= self.read.max_read_bytes {
            return Err(invalid(
                "read.overlap_bytes",
                "must be smaller than read.max_read_bytes",
            ));
        }
        if self.read.history_chunk_bytes == 0 {
            return Err(invalid("read.history_chunk_bytes", "must be greater than 0"));
        }
        if self.ledger.rotation_count == 0 {
            return Err(invalid("ledger.rotation_count", "must be at least 1"));
        }
        if self.watch.conversation_filename.trim().is_empty() {
            return Err(invalid("watch.conversation_filename", "must not be empty"));
        }
        Ok(())
    }

    pub fn tail_options(&self) -> TailOptions {
        TailOptions {
            limits: WindowLimits {
                max_read_bytes: self.read.max_read_bytes,
                overlap_bytes: self.read.overlap_bytes,
            },
            history_chunk_bytes: self.read.history_chunk_bytes,
        }
    }

    pub fn rotation_policy(&self) -> RotationPolicy {
        RotationPolicy {
            max_file_size_bytes: self.ledger.max_file_size_bytes,
            rotation_count: self.ledger.rotation_count,
        }
    }

    /// Effective configuration as TOML (for `subtrail config`)
    pub fn to_toml_string(&self) -> SubtrailResult<String> {
        toml::to_string_pretty(self).map_err(|e| SubtrailError::InvalidConfig {
            key: "config".to_string(),
            message: e.to_string(),
        })
    }
}

fn invalid(key: &str, message: &str) -> SubtrailError {
    SubtrailError::InvalidConfig {
        key: key.to_string(),
        message: message.to_string(),
    }
}

fn default_tasks_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Code/User/globalStorage/rooveterinaryinc.roo-cline/tasks")
}

fn default_conversation_filename() -> String {
    "api_conversation_history.json".to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_max_file_age_days() -> u64 {
    7
}

fn default_max_read_bytes() -> u64 {
    WindowLimits::default().max_read_bytes
}

fn default_overlap_bytes() -> u64 {
    WindowLimits::default().overlap_bytes
}

fn default_history_chunk_bytes() -> u64 {
    DEFAULT_HISTORY_CHUNK_BYTES
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("subtrail")
}

fn default_changelog_dir() -> PathBuf {
    data_dir().join("changelogs")
}

fn default_ledger_dir() -> PathBuf {
    data_dir().join("logs")
}

fn default_max_file_size_bytes() -> u64 {
    RotationPolicy::default().max_file_size_bytes
}

fn default_rotation_count() -> u32 {
    RotationPolicy::default().rotation_count
}

fn default_skip_modes() -> Vec<Mode> {
    vec![Mode::Ask]
}
