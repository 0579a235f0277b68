use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Local;
use tracing::info;

use subtrail::application::{TailUseCase, WatchEvent, WatchOptions, WatchUseCase};
use subtrail::infrastructure::{ChangelogEmitter, ChangelogWriter, LocalFs, ProcessedLedger};

pub fn cmd_watch(
    config_path: Option<&Path>,
    tasks: Option<PathBuf>,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let mut config = super::load_config(config_path)?.config;
    // CLI flags beat file and environment
    if let Some(tasks) = tasks {
        config.watch.tasks_path = tasks;
    }
    if let Some(output) = output {
        config.output.changelog_dir = output;
    }

    if !config.watch.tasks_path.is_dir() {
        bail!(
            "tasks directory not found: {} (set watch.tasks_path or pass --tasks)",
            config.watch.tasks_path.display()
        );
    }
    std::fs::create_dir_all(&config.output.changelog_dir).with_context(|| {
        format!(
            "cannot create changelog directory {}",
            config.output.changelog_dir.display()
        )
    })?;

    let ledger = ProcessedLedger::open(&config.ledger.dir, config.rotation_policy());
    let emitter = ChangelogEmitter::new(
        ChangelogWriter::new(&config.output.changelog_dir),
        ledger,
        config.filter.skip_modes.clone(),
    );
    let mut tail = TailUseCase::new(LocalFs::new(), emitter, config.tail_options());

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("failed to install Ctrl+C handler")?;

    if !json {
        println!("Subtrail watch");
        println!("  tasks:      {}", config.watch.tasks_path.display());
        println!("  changelogs: {}", config.output.changelog_dir.display());
        println!("Press Ctrl+C to stop.");
    }

    let use_case = WatchUseCase::new(WatchOptions::from_config(&config));
    use_case.start(&mut tail, running, |event| {
        if json {
            println!("{}", event.to_json());
        } else {
            render_event(&event);
        }
    })?;

    let tail_stats = tail.stats();
    let emit_stats = tail.sink().stats();
    info!(?tail_stats, ?emit_stats, "watch stopped");

    if json {
        let summary = serde_json::json!({
            "event": "session_stats",
            "command": "watch",
            "tail": tail_stats,
            "changelogs": emit_stats,
        });
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!();
        println!("Session statistics:");
        println!("  Files processed:    {}", tail_stats.files_processed);
        println!("  Subtasks found:     {}", tail_stats.subtasks_found);
        println!("  Changelogs created: {}", emit_stats.changelogs_created);
        println!("  Duplicates skipped: {}", emit_stats.duplicates_skipped);
        println!("  Mode skipped:       {}", emit_stats.mode_skipped);
        println!(
            "  Errors:             {}",
            emit_stats.errors + tail_stats.read_errors
        );
    }
    Ok(())
}

fn render_event(event: &WatchEvent) {
    let ts = Local::now().format("%H:%M:%S");
    match event {
        WatchEvent::WatchStarted {
            tracked,
            skipped_old,
            previously_processed,
            ..
        } => println!(
            "[{ts}] watching {tracked} file(s) ({skipped_old} older ones ignored, \
             {previously_processed} subtask(s) already processed)"
        ),
        WatchEvent::FileChanged { path } => println!("[{ts}] changed  {path}"),
        WatchEvent::Baselined { path } => println!("[{ts}] tracking {path}"),
        WatchEvent::SubtaskProcessed {
            id,
            mode,
            outcome,
            changelog,
        } => match changelog {
            Some(file) => println!("[{ts}] {outcome} {id} ({mode}) -> {file}"),
            None => println!("[{ts}] {outcome} {id} ({mode})"),
        },
        WatchEvent::Unmatched { path, count } => {
            eprintln!("[{ts}] {count} unmatched completion(s) in {path}")
        }
        WatchEvent::ReadError { path, message } => {
            eprintln!("[{ts}] read error on {path}: {message}")
        }
        WatchEvent::Shutdown => println!("[{ts}] shutting down"),
    }
}
