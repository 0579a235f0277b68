//! End-to-end: history file on disk -> tail -> ledger -> changelog files.

mod common;

use std::fs;
use std::path::Path;

use tempfile::tempdir;

use subtrail::infrastructure::RotationPolicy;
use subtrail::{
    ChangelogEmitter, ChangelogWriter, LocalFs, Mode, ProcessedLedger, TailOptions, TailUseCase,
};

use common::{append, completion, start, subtask_id, HISTORY_FILE};

fn pipeline(root: &Path) -> TailUseCase<LocalFs, ChangelogEmitter> {
    let ledger = ProcessedLedger::open(root.join("logs"), RotationPolicy::default());
    let emitter = ChangelogEmitter::new(
        ChangelogWriter::new(root.join("changelogs")),
        ledger,
        vec![Mode::Ask],
    );
    TailUseCase::new(LocalFs::new(), emitter, TailOptions::default())
}

fn changelogs(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(root.join("changelogs"))
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

#[test]
fn test_new_subtask_becomes_changelog() {
    let dir = tempdir().unwrap();
    let history = dir.path().join(HISTORY_FILE);
    fs::write(&history, "[").unwrap();

    let mut tail = pipeline(dir.path());
    tail.on_file_ready(&history);

    append(
        &history,
        start(Mode::Code, "# Add login\\nUse the session API").as_bytes(),
    );
    append(&history, "x".repeat(4096).as_bytes());
    append(
        &history,
        completion(&subtask_id(1), "Login added.\\n\\n## Files\\n- auth.rs").as_bytes(),
    );
    let report = tail.on_file_ready(&history);

    assert_eq!(report.entries, 1);
    assert_eq!(report.accepted, 1);
    let names = changelogs(dir.path());
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("changelog_"));
    assert!(names[0].ends_with(&format!("_UTC_{}.md", subtask_id(1))));

    let markdown = fs::read_to_string(dir.path().join("changelogs").join(&names[0])).unwrap();
    assert!(markdown.starts_with("# Part of Changelog"));
    assert!(markdown.contains("**Mode:** code"));
    assert!(markdown.contains("### Add login\nUse the session API"));
    assert!(markdown.contains("### Files\n- auth.rs"));

    let ledger = fs::read_to_string(dir.path().join("logs").join("processed_ids.log")).unwrap();
    assert!(ledger.starts_with(&format!("{}|", subtask_id(1))));
}

#[test]
fn test_ask_mode_is_recorded_without_changelog() {
    let dir = tempdir().unwrap();
    let history = dir.path().join(HISTORY_FILE);
    fs::write(&history, "").unwrap();

    let mut tail = pipeline(dir.path());
    tail.initialize(&history).unwrap();
    append(&history, start(Mode::Ask, "What is this?").as_bytes());
    append(&history, completion(&subtask_id(2), "An answer").as_bytes());
    tail.on_file_ready(&history);

    assert!(changelogs(dir.path()).is_empty());
    assert_eq!(tail.sink().stats().mode_skipped, 1);
    assert!(tail.sink().ledger().contains(&subtask_id(2)));
}

#[test]
fn test_restart_does_not_duplicate_changelogs() {
    let dir = tempdir().unwrap();
    let history = dir.path().join(HISTORY_FILE);
    fs::write(&history, "").unwrap();

    let mut tail = pipeline(dir.path());
    tail.initialize(&history).unwrap();
    append(&history, start(Mode::Debug, "Fix the crash").as_bytes());
    append(&history, completion(&subtask_id(3), "Fixed").as_bytes());
    tail.on_file_ready(&history);
    assert_eq!(changelogs(dir.path()).len(), 1);
    drop(tail);

    // a fresh process re-reading the same bytes from the start
    let mut tail = pipeline(dir.path());
    tail.initialize_at(&history, 0);
    tail.on_file_ready(&history);

    assert_eq!(changelogs(dir.path()).len(), 1);
    assert_eq!(tail.sink().stats().duplicates_skipped, 1);
}
