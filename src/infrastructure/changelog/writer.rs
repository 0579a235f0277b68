//! Changelog file writer

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use super::formatter;
use crate::domain::entities::MatchedEntry;
use crate::error::SubtrailResult;
use crate::infrastructure::fs::atomic_write;

/// Writes one markdown file per entry into the output directory
#[derive(Debug, Clone)]
pub struct ChangelogWriter {
    output_dir: PathBuf,
}

impl ChangelogWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the changelog stamped with the current UTC time
    pub fn write(&self, entry: &MatchedEntry) -> SubtrailResult<PathBuf> {
        self.write_at(entry, Utc::now())
    }

    pub fn write_at(&self, entry: &MatchedEntry, at: DateTime<Utc>) -> SubtrailResult<PathBuf> {
        let path = self.output_dir.join(formatter::file_name(&entry.id, at));
        atomic_write(&path, formatter::render(entry, at).as_bytes())?;
        info!(id = %entry.id, path = %path.display(), "created changelog");
        Ok(path)
    }

    /// Number of `.md` files in the output directory
    pub fn changelog_count(&self) -> usize {
        std::fs::read_dir(&self.output_dir)
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
                    .count()
            })
            .unwrap_or(0)
    }
}
