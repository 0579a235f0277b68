//! Mode value object - which agent mode a subtask was delegated to
//!
//! Every start marker names exactly one mode; the extractor reports it on the
//! matched entry so the emitter can decide what to keep.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Agent mode named in a `new_task` start marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Ask,
    Code,
    Debug,
    Architect,
}

impl Mode {
    /// All modes, in marker-table order
    pub const ALL: [Mode; 4] = [Mode::Ask, Mode::Code, Mode::Debug, Mode::Architect];

    /// Lowercase name as it appears inside the start marker
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Ask => "ask",
            Mode::Code => "code",
            Mode::Debug => "debug",
            Mode::Architect => "architect",
        }
    }

    /// Parse the raw mode bytes captured from a start marker
    pub fn from_marker_bytes(raw: &[u8]) -> Option<Mode> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str().as_bytes() == raw)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown mode name (config, env override)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode '{0}' (expected ask, code, debug or architect)")]
pub struct ParseModeError(pub String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| ParseModeError(s.trim().to_string()))
    }
}
