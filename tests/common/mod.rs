//! Shared builders for conversation history content.

#![allow(dead_code)]

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use subtrail::domain::value_objects::markers::{
    start_marker, COMPLETION_PREFIX, COMPLETION_SUFFIX, COMPLETION_TERMINATOR, START_TERMINATOR,
};
use subtrail::Mode;

pub const HISTORY_FILE: &str = "api_conversation_history.json";

/// A `new_task` tool call carrying `instruction`
pub fn start(mode: Mode, instruction: &str) -> String {
    format!(
        r#"{{"role":"assistant","content":[{{"type":"tool_use",{}{}{}"}}}}]}},"#,
        start_marker(mode),
        instruction,
        START_TERMINATOR
    )
}

/// The user message reporting subtask `id` as done
pub fn completion(id: &str, result: &str) -> String {
    format!(
        r#"{{"role":"user","content":[{{"type":"text",{COMPLETION_PREFIX}{id}{COMPLETION_SUFFIX}{result}{COMPLETION_TERMINATOR}"}}]}},"#
    )
}

pub fn subtask_id(n: usize) -> String {
    format!("{n:08x}-0000-4000-8000-000000000000")
}

pub fn append(path: &Path, bytes: &[u8]) {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .unwrap();
    file.write_all(bytes).unwrap();
}
