//! Configuration loading and environment overrides

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::value_objects::Mode;
use crate::error::{SubtrailError, SubtrailResult};

use super::types::Config;

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "subtrail.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Effective configuration and where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub warnings: Vec<ConfigWarning>,
    /// File the config was read from; `None` means built-in defaults
    pub source: Option<PathBuf>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> SubtrailResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| SubtrailError::ConfigParse {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Resolve configuration: `explicit` > `./subtrail.toml` > user config >
/// defaults, then `SUBTRAIL_*` overrides, then validation.
///
/// An explicit path that does not exist is an error; the implicit
/// locations are simply skipped when absent.
pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> SubtrailResult<LoadedConfig> {
    let candidate = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let local = cwd.join(LOCAL_CONFIG_FILE);
            let user = user_config_dir().map(|dir| dir.join("subtrail/config.toml"));
            std::iter::once(local)
                .chain(user)
                .find(|path| path.is_file())
        }
    };

    let (config, warnings) = match &candidate {
        Some(path) => load_with_warnings(path)?,
        None => (Config::default(), Vec::new()),
    };
    debug!(source = ?candidate, "configuration resolved");

    let config = apply_env_overrides(config, |key| std::env::var(key).ok())?;
    config.validate()?;

    Ok(LoadedConfig {
        config,
        warnings,
        source: candidate,
    })
}

/// Apply `SUBTRAIL_*` overrides read through `lookup`
pub fn apply_env_overrides<F>(mut config: Config, lookup: F) -> SubtrailResult<Config>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup("SUBTRAIL_TASKS_PATH") {
        config.watch.tasks_path = PathBuf::from(path);
    }
    if let Some(path) = lookup("SUBTRAIL_CHANGELOG_DIR") {
        config.output.changelog_dir = PathBuf::from(path);
    }
    if let Some(path) = lookup("SUBTRAIL_LEDGER_DIR") {
        config.ledger.dir = PathBuf::from(path);
    }

    if let Some(value) = lookup("SUBTRAIL_MAX_READ_BYTES") {
        config.read.max_read_bytes = parse_number("SUBTRAIL_MAX_READ_BYTES", &value)?;
    }
    if let Some(value) = lookup("SUBTRAIL_OVERLAP_BYTES") {
        config.read.overlap_bytes = parse_number("SUBTRAIL_OVERLAP_BYTES", &value)?;
    }
    if let Some(value) = lookup("SUBTRAIL_DEBOUNCE_MS") {
        config.watch.debounce_ms = parse_number("SUBTRAIL_DEBOUNCE_MS", &value)?;
    }
    if let Some(value) = lookup("SUBTRAIL_MAX_FILE_AGE_DAYS") {
        config.watch.max_file_age_days = parse_number("SUBTRAIL_MAX_FILE_AGE_DAYS", &value)?;
    }
    if let Some(value) = lookup("SUBTRAIL_MAX_LOG_FILE_SIZE_BYTES") {
        config.ledger.max_file_size_bytes =
            parse_number("SUBTRAIL_MAX_LOG_FILE_SIZE_BYTES", &value)?;
    }
    if let Some(value) = lookup("SUBTRAIL_ROTATION_COUNT") {
        config.ledger.rotation_count = parse_number("SUBTRAIL_ROTATION_COUNT", &value)?;
    }

    // SUBTRAIL_SKIP_MODES (comma-separated) replaces the list
    if let Some(value) = lookup("SUBTRAIL_SKIP_MODES") {
        config.filter.skip_modes = value
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.parse::<Mode>()
                    .map_err(|e| SubtrailError::InvalidConfig {
                        key: "SUBTRAIL_SKIP_MODES".to_string(),
                        message: e.to_string(),
                    })
            })
            .collect::<SubtrailResult<Vec<_>>>()?;
    }

    // SUBTRAIL_SKIP_ASK_MODE toggles just the ask mode
    if let Some(value) = lookup("SUBTRAIL_SKIP_ASK_MODE") {
        let skip = matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes");
        config.filter.skip_modes.retain(|mode| *mode != Mode::Ask);
        if skip {
            config.filter.skip_modes.insert(0, Mode::Ask);
        }
    }

    Ok(config)
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> SubtrailResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| SubtrailError::InvalidConfig {
            key: key.to_string(),
            message: format!("expected a non-negative integer, got '{}'", value),
        })
}

/// XDG config directory, falling back to the platform config directory
fn user_config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "watch",
        "tasks_path",
        "conversation_filename",
        "debounce_ms",
        "max_file_age_days",
        "read",
        "max_read_bytes",
        "overlap_bytes",
        "history_chunk_bytes",
        "output",
        "changelog_dir",
        "ledger",
        "dir",
        "max_file_size_bytes",
        "rotation_count",
        "filter",
        "skip_modes",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
