use std::path::Path;

use anyhow::{bail, Result};

use subtrail::application::TailUseCase;
use subtrail::domain::entities::MatchedEntry;
use subtrail::infrastructure::LocalFs;

/// One-shot extraction over a single file, printed as NDJSON
pub fn cmd_scan(config_path: Option<&Path>, file: &Path, from: u64) -> Result<()> {
    if !file.is_file() {
        bail!("not a file: {}", file.display());
    }
    let loaded = super::load_config(config_path)?;

    let mut tail = TailUseCase::new(
        LocalFs::new(),
        Vec::<MatchedEntry>::new(),
        loaded.config.tail_options(),
    );
    tail.initialize_at(file, from);
    let report = tail.on_file_ready(file);
    if let Some(error) = report.error {
        bail!("failed to read {}: {}", file.display(), error);
    }

    for entry in tail.sink() {
        println!("{}", serde_json::to_string(entry)?);
    }
    eprintln!(
        "{} subtask(s), {} unmatched completion(s), {} window(s)",
        report.entries, report.unmatched, report.windows
    );
    Ok(())
}
