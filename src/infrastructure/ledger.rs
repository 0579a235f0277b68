//! Processed-ID Ledger
//!
//! Durable set of subtask ids that already produced (or deliberately skipped)
//! a changelog. Persists to `<dir>/processed_ids.log`, one `id|timestamp`
//! line per id, rotating to `.1 .. .N` once the active file grows too large.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use fs2::FileExt;
use tracing::{debug, info, warn};

pub const LEDGER_FILE_NAME: &str = "processed_ids.log";
const LOCK_FILE_NAME: &str = "processed_ids.lock";

/// When and how far the ledger rotates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    pub max_file_size_bytes: u64,
    /// Rotated files kept (`.1` through `.N`)
    pub rotation_count: u32,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 1024 * 1024,
            rotation_count: 3,
        }
    }
}

#[derive(Debug)]
pub struct ProcessedLedger {
    dir: PathBuf,
    policy: RotationPolicy,
    ids: HashSet<String>,
}

impl ProcessedLedger {
    /// Open the ledger in `dir`, loading the active and rotated logs.
    ///
    /// Unreadable log files are logged and skipped; a missing directory is
    /// an empty ledger.
    pub fn open(dir: impl Into<PathBuf>, policy: RotationPolicy) -> Self {
        let mut ledger = Self {
            dir: dir.into(),
            policy,
            ids: HashSet::new(),
        };

        let files: Vec<PathBuf> = std::iter::once(ledger.active_path())
            .chain((1..=policy.rotation_count).map(|n| ledger.rotated_path(n)))
            .collect();
        for file in files {
            match fs::read_to_string(&file) {
                Ok(content) => ledger.ids.extend(parse_ids(&content)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %file.display(), error = %e, "could not load ledger file"),
            }
        }

        info!(
            dir = %ledger.dir.display(),
            count = ledger.ids.len(),
            "loaded processed ids"
        );
        ledger
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn active_path(&self) -> PathBuf {
        self.dir.join(LEDGER_FILE_NAME)
    }

    fn rotated_path(&self, n: u32) -> PathBuf {
        self.dir.join(format!("{LEDGER_FILE_NAME}.{n}"))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Record `id` as processed.
    ///
    /// Returns `false` if it was already known. Persistence failures are
    /// logged; the id stays recorded in memory either way.
    pub fn mark(&mut self, id: &str) -> bool {
        if !self.ids.insert(id.to_string()) {
            return false;
        }
        if let Err(e) = self.persist(id) {
            warn!(id, dir = %self.dir.display(), error = %e, "failed to persist processed id");
        }
        true
    }

    fn persist(&self, id: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let lock_file = File::create(self.dir.join(LOCK_FILE_NAME))?;
        lock_file.lock_exclusive()?;

        let result = self.append_line(id).and_then(|()| self.rotate_if_needed());

        if let Err(e) = lock_file.unlock() {
            warn!(dir = %self.dir.display(), error = %e, "failed to release ledger lock");
        }
        result
    }

    fn append_line(&self, id: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.active_path())?;
        writeln!(file, "{}|{}", id, Utc::now().to_rfc3339())
    }

    fn rotate_if_needed(&self) -> io::Result<()> {
        let size = fs::metadata(self.active_path())?.len();
        if size < self.policy.max_file_size_bytes {
            return Ok(());
        }

        info!(size, "rotating processed id log");
        let oldest = self.rotated_path(self.policy.rotation_count);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
            debug!(path = %oldest.display(), "deleted oldest ledger file");
        }
        for n in (1..self.policy.rotation_count).rev() {
            let current = self.rotated_path(n);
            if current.exists() {
                fs::rename(&current, self.rotated_path(n + 1))?;
            }
        }
        fs::rename(self.active_path(), self.rotated_path(1))?;
        File::create(self.active_path())?;
        Ok(())
    }
}

/// Ids from ledger file content; bare-id lines are accepted too
fn parse_ids(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.split('|').next().unwrap_or(line).to_string())
}
