//! Startup discovery of conversation history files

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use ignore::WalkBuilder;
use tracing::{debug, warn};

/// History files found under the tasks directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Files to baseline, sorted
    pub files: Vec<PathBuf>,
    /// Files left untracked because they are older than the age limit
    pub skipped_old: usize,
}

/// Walk `root` for files named `file_name`.
///
/// Hidden entries and ignore files are not special here: every task folder
/// counts. With `max_age`, files last modified longer ago than that (as of
/// `now`) are skipped.
pub fn discover_history_files(
    root: &Path,
    file_name: &str,
    max_age: Option<Duration>,
    now: SystemTime,
) -> Discovery {
    let mut discovery = Discovery::default();

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .build();

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) || entry.file_name() != file_name {
            continue;
        }

        if let Some(max_age) = max_age {
            let modified = entry.metadata().ok().and_then(|m| m.modified().ok());
            let too_old = modified
                .and_then(|mtime| now.duration_since(mtime).ok())
                .is_some_and(|age| age > max_age);
            if too_old {
                debug!(path = %entry.path().display(), "skipping old history file");
                discovery.skipped_old += 1;
                continue;
            }
        }

        discovery.files.push(entry.into_path());
    }

    discovery.files.sort();
    discovery
}
