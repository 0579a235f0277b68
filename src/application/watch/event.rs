//! Watch event types, options and debounce state

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::Config;

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Directory holding one folder per task
    pub tasks_path: PathBuf,
    /// File name of the conversation history inside each task folder
    pub conversation_filename: String,
    /// Quiet period before a changed file is processed
    pub debounce: Duration,
    /// Only baseline files modified within this window (`None` = all)
    pub max_file_age: Option<Duration>,
}

impl WatchOptions {
    /// Create new watch options with default timing
    pub fn new(tasks_path: PathBuf) -> Self {
        Self {
            tasks_path,
            conversation_filename: "api_conversation_history.json".to_string(),
            debounce: Duration::from_millis(500),
            max_file_age: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let days = config.watch.max_file_age_days;
        Self {
            tasks_path: config.watch.tasks_path.clone(),
            conversation_filename: config.watch.conversation_filename.clone(),
            debounce: Duration::from_millis(config.watch.debounce_ms),
            max_file_age: (days > 0).then(|| Duration::from_secs(days * 24 * 60 * 60)),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_max_file_age(mut self, max_file_age: Option<Duration>) -> Self {
        self.max_file_age = max_file_age;
        self
    }
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    /// Watch started; existing files are baselined
    WatchStarted {
        tasks_path: String,
        tracked: usize,
        skipped_old: usize,
        previously_processed: usize,
    },
    /// Debounced change handed to the tailer
    FileChanged { path: String },
    /// First sighting of a file; its content so far is skipped
    Baselined { path: String },
    /// One matched subtask and what the emitter did with it
    SubtaskProcessed {
        id: String,
        mode: String,
        outcome: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        changelog: Option<String>,
    },
    /// Completions that could not be paired with an instruction
    Unmatched { path: String, count: usize },
    /// Transient read failure; retried on the next change
    ReadError { path: String, message: String },
    /// Watch stopped
    Shutdown,
}

impl WatchEvent {
    /// Convert to JSON string with "command": "watch" field included
    pub fn to_json(&self) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("watch"));
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Per-path debounce state
///
/// Each change refreshes the path's timestamp; a path is ready once it has
/// been quiet for the whole debounce period.
#[derive(Debug)]
pub struct DebounceState {
    quiet: Duration,
    pending: HashMap<PathBuf, Instant>,
}

impl DebounceState {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: HashMap::new(),
        }
    }

    /// Record a change now
    pub fn add_change(&mut self, path: PathBuf) {
        self.add_change_at(path, Instant::now());
    }

    pub fn add_change_at(&mut self, path: PathBuf, at: Instant) {
        self.pending.insert(path, at);
    }

    /// Remove and return paths quiet since `now - quiet`, sorted
    pub fn take_ready(&mut self, now: Instant) -> Vec<PathBuf> {
        let quiet = self.quiet;
        let mut ready: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(_, last)| now.saturating_duration_since(**last) >= quiet)
            .map(|(path, _)| path.clone())
            .collect();
        for path in &ready {
            self.pending.remove(path);
        }
        ready.sort();
        ready
    }

    /// Check if there are pending changes
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
