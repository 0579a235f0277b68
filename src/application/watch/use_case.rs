//! Watch Use Case implementation

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::application::tail::TailUseCase;
use crate::domain::ports::FileSource;
use crate::error::{SubtrailError, SubtrailResult};
use crate::infrastructure::changelog::{ChangelogEmitter, EmitOutcome};

use super::baseline::discover_history_files;
use super::event::{DebounceState, WatchEvent, WatchOptions};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Watch Use Case
///
/// Baselines the history files already present, then hands every debounced
/// change to the tail coordinator. Blocks until `running` is cleared.
pub struct WatchUseCase {
    options: WatchOptions,
}

impl WatchUseCase {
    pub fn new(options: WatchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &WatchOptions {
        &self.options
    }

    /// Start watching (blocking)
    pub fn start<S, F>(
        &self,
        tail: &mut TailUseCase<S, ChangelogEmitter>,
        running: Arc<AtomicBool>,
        mut on_event: F,
    ) -> SubtrailResult<()>
    where
        S: FileSource,
        F: FnMut(WatchEvent),
    {
        let root = &self.options.tasks_path;
        if !root.is_dir() {
            return Err(SubtrailError::WatchRootMissing { path: root.clone() });
        }
        let root = root.canonicalize()?;

        let (tracked, skipped_old) = self.baseline_existing(tail, &root, &mut on_event);
        on_event(WatchEvent::WatchStarted {
            tasks_path: root.display().to_string(),
            tracked,
            skipped_old,
            previously_processed: tail.sink().ledger().len(),
        });

        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                        for path in event.paths {
                            let _ = tx.send(path);
                        }
                    }
                }
                Err(e) => warn!(error = %e, "file watcher error"),
            },
            Config::default(),
        )?;
        watcher.watch(&root, RecursiveMode::Recursive)?;
        info!(path = %root.display(), "watching for conversation changes");

        let mut debounce = DebounceState::new(self.options.debounce);

        while running.load(Ordering::SeqCst) {
            if let Ok(path) = rx.recv_timeout(POLL_INTERVAL) {
                if self.is_history_file(&path) {
                    let canonical = path.canonicalize().unwrap_or(path);
                    debounce.add_change(canonical);
                }
            }

            for path in debounce.take_ready(Instant::now()) {
                on_event(WatchEvent::FileChanged {
                    path: path.display().to_string(),
                });
                process_ready(tail, &path, &mut on_event);
            }
        }

        on_event(WatchEvent::Shutdown);
        Ok(())
    }

    fn is_history_file(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| name == self.options.conversation_filename.as_str())
    }

    /// Returns (tracked, skipped_old)
    fn baseline_existing<S, F>(
        &self,
        tail: &mut TailUseCase<S, ChangelogEmitter>,
        root: &Path,
        on_event: &mut F,
    ) -> (usize, usize)
    where
        S: FileSource,
        F: FnMut(WatchEvent),
    {
        let discovery = discover_history_files(
            root,
            &self.options.conversation_filename,
            self.options.max_file_age,
            SystemTime::now(),
        );

        let mut tracked = 0;
        for path in discovery.files {
            let path: PathBuf = path.canonicalize().unwrap_or(path);
            match tail.initialize(&path) {
                Ok(true) => {
                    tracked += 1;
                    on_event(WatchEvent::Baselined {
                        path: path.display().to_string(),
                    });
                }
                Ok(false) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "could not baseline file"),
            }
        }
        debug!(tracked, skipped_old = discovery.skipped_old, "startup baseline done");
        (tracked, discovery.skipped_old)
    }
}

/// Run one debounced change through the coordinator and report what the
/// changelog emitter did with each matched entry.
pub fn process_ready<S, F>(
    tail: &mut TailUseCase<S, ChangelogEmitter>,
    path: &Path,
    on_event: &mut F,
) where
    S: FileSource,
    F: FnMut(WatchEvent),
{
    let display = path.display().to_string();
    let report = tail.on_file_ready(path);

    if report.baselined {
        on_event(WatchEvent::Baselined {
            path: display.clone(),
        });
    }
    if let Some(message) = report.error {
        on_event(WatchEvent::ReadError {
            path: display.clone(),
            message,
        });
    }

    for record in tail.sink_mut().drain_records() {
        let (outcome, changelog) = match record.outcome {
            EmitOutcome::Created(file) => ("created", Some(file.display().to_string())),
            EmitOutcome::Duplicate => ("duplicate", None),
            EmitOutcome::ModeSkipped => ("mode_skipped", None),
            EmitOutcome::Failed(_) => ("failed", None),
        };
        on_event(WatchEvent::SubtaskProcessed {
            id: record.id,
            mode: record.mode.to_string(),
            outcome: outcome.to_string(),
            changelog,
        });
    }

    if report.unmatched > 0 {
        on_event(WatchEvent::Unmatched {
            path: display,
            count: report.unmatched,
        });
    }
}
