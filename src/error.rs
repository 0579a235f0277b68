//! Error types for subtrail
//!
//! Uses `thiserror` for library errors. The binary wraps these in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::FsError;

/// Result type alias for subtrail operations
pub type SubtrailResult<T> = Result<T, SubtrailError>;

/// Main error type for subtrail operations
#[derive(Error, Debug)]
pub enum SubtrailError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stat/read failure on a tailed file
    #[error("{0}")]
    File(#[from] FsError),

    /// Config file could not be parsed
    #[error("invalid config in {file}: {message}")]
    ConfigParse { file: PathBuf, message: String },

    /// Config value out of range or inconsistent with another value
    #[error("invalid config value for '{key}': {message}")]
    InvalidConfig { key: String, message: String },

    /// Directory to watch does not exist
    #[error("watch root not found: {path}")]
    WatchRootMissing { path: PathBuf },

    /// Filesystem notification backend failed
    #[error("file watcher error: {message}")]
    Watcher { message: String },
}

impl From<notify::Error> for SubtrailError {
    fn from(err: notify::Error) -> Self {
        SubtrailError::Watcher {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_error_display_invalid_config() {
        let err = SubtrailError::InvalidConfig {
            key: "read.overlap_bytes".to_string(),
            message: "must be smaller than read.max_read_bytes".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value for 'read.overlap_bytes': must be smaller than read.max_read_bytes"
        );
    }

    #[test]
    fn test_error_display_watch_root_missing() {
        let err = SubtrailError::WatchRootMissing {
            path: PathBuf::from("/nope/tasks"),
        };
        assert_eq!(err.to_string(), "watch root not found: /nope/tasks");
    }

    #[test]
    fn test_error_from_fs_error_keeps_path() {
        let err: SubtrailError = FsError::NotFound(PathBuf::from("a/history.json")).into();
        assert_eq!(err.to_string(), "File not found: a/history.json");
    }
}
