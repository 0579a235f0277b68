//! Marker grammar
//!
//! The literals below are matched byte-for-byte against the raw file stream.
//! `\n` inside them is the two-character escape sequence found in JSON text,
//! not a newline.

use std::sync::OnceLock;

use memchr::memmem::Finder;
use regex::bytes::Regex;

use super::mode::Mode;

/// Text before the subtask id in a completion marker
pub const COMPLETION_PREFIX: &str = r#""content":"Subtask "#;

/// Text after the subtask id in a completion marker; the result payload follows
pub const COMPLETION_SUFFIX: &str = r#" completed.\n\nResult:\n"#;

/// Ends the result payload
pub const COMPLETION_TERMINATOR: &str = r#""},{"type":"text","text":"<environment_details>"#;

/// Ends the instruction payload
pub const START_TERMINATOR: &str = r#"","todos":""#;

/// Shared text around the mode name in every start marker
pub const START_MARKER_HEAD: &str = r#""name":"new_task","input":{"mode":""#;
pub const START_MARKER_TAIL: &str = r#"","message":""#;

pub const START_MARKER_ASK: &str = r#""name":"new_task","input":{"mode":"ask","message":""#;
pub const START_MARKER_CODE: &str = r#""name":"new_task","input":{"mode":"code","message":""#;
pub const START_MARKER_DEBUG: &str = r#""name":"new_task","input":{"mode":"debug","message":""#;
pub const START_MARKER_ARCHITECT: &str =
    r#""name":"new_task","input":{"mode":"architect","message":""#;

/// Lowercase hyphenated 8-4-4-4-12 hex id
const ID_PATTERN: &str = "[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}";

/// Start marker literal for a mode
pub fn start_marker(mode: Mode) -> &'static str {
    match mode {
        Mode::Ask => START_MARKER_ASK,
        Mode::Code => START_MARKER_CODE,
        Mode::Debug => START_MARKER_DEBUG,
        Mode::Architect => START_MARKER_ARCHITECT,
    }
}

/// Length of the longest start marker, used to overlap backward history chunks
pub fn longest_start_marker() -> usize {
    Mode::ALL
        .into_iter()
        .map(|mode| start_marker(mode).len())
        .max()
        .unwrap_or(0)
}

/// Completion marker; group 1 captures the subtask id
pub fn completion_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let source = format!(
            "{}({}){}",
            regex::escape(COMPLETION_PREFIX),
            ID_PATTERN,
            regex::escape(COMPLETION_SUFFIX)
        );
        Regex::new(&source).expect("completion marker pattern is valid")
    })
}

/// Any of the start markers; group 1 captures the mode name
pub fn start_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let modes: Vec<&str> = Mode::ALL.into_iter().map(|mode| mode.as_str()).collect();
        let source = format!(
            "{}({}){}",
            regex::escape(START_MARKER_HEAD),
            modes.join("|"),
            regex::escape(START_MARKER_TAIL)
        );
        Regex::new(&source).expect("start marker pattern is valid")
    })
}

/// Length of a subtask id (a hyphenated UUID)
pub const SUBTASK_ID_LEN: usize = 36;

/// Full length of a completion marker, prefix through suffix
pub const fn completion_marker_len() -> usize {
    COMPLETION_PREFIX.len() + SUBTASK_ID_LEN + COMPLETION_SUFFIX.len()
}

/// Searcher for [`COMPLETION_TERMINATOR`]
pub fn completion_terminator() -> &'static Finder<'static> {
    static FINDER: OnceLock<Finder<'static>> = OnceLock::new();
    FINDER.get_or_init(|| Finder::new(COMPLETION_TERMINATOR.as_bytes()))
}

/// Searcher for [`START_TERMINATOR`]
pub fn start_terminator() -> &'static Finder<'static> {
    static FINDER: OnceLock<Finder<'static>> = OnceLock::new();
    FINDER.get_or_init(|| Finder::new(START_TERMINATOR.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "11111111-2222-3333-4444-555555555555";

    #[test]
    fn completion_suffix_is_escaped_text() {
        assert!(COMPLETION_SUFFIX.contains("\\n\\nResult:\\n"));
        assert!(!COMPLETION_SUFFIX.contains('\n'));
    }

    #[test]
    fn completion_pattern_captures_id() {
        let text = format!(r#"xx"content":"Subtask {ID} completed.\n\nResult:\nHello"#);
        let caps = completion_pattern().captures(text.as_bytes()).unwrap();
        assert_eq!(&caps[1], ID.as_bytes());
        assert_eq!(caps.get(0).unwrap().start(), 2);
        assert_eq!(&text.as_bytes()[caps.get(0).unwrap().end()..], b"Hello");
    }

    #[test]
    fn completion_pattern_rejects_uppercase_ids() {
        let text = format!(
            r#""content":"Subtask {} completed.\n\nResult:\n"#,
            ID.replace('1', "A")
        );
        assert!(completion_pattern().captures(text.as_bytes()).is_none());
    }

    #[test]
    fn completion_pattern_rejects_real_newlines() {
        let text = format!("\"content\":\"Subtask {ID} completed.\n\nResult:\n");
        assert!(completion_pattern().captures(text.as_bytes()).is_none());
    }

    #[test]
    fn start_pattern_matches_every_mode() {
        for mode in Mode::ALL {
            let marker = start_marker(mode);
            assert_eq!(
                marker,
                format!("{START_MARKER_HEAD}{}{START_MARKER_TAIL}", mode.as_str())
            );
            let caps = start_pattern().captures(marker.as_bytes()).unwrap();
            assert_eq!(Mode::from_marker_bytes(&caps[1]), Some(mode));
            assert_eq!(caps.get(0).unwrap().len(), marker.len());
        }
    }

    #[test]
    fn start_pattern_ignores_other_modes() {
        let text = r#""name":"new_task","input":{"mode":"orchestrator","message":""#;
        assert!(start_pattern().find(text.as_bytes()).is_none());
    }

    #[test]
    fn longest_start_marker_is_architect() {
        assert_eq!(longest_start_marker(), START_MARKER_ARCHITECT.len());
    }

    #[test]
    fn terminator_finders_locate_first_occurrence() {
        let mut hay = b"\xff\xfeabc".to_vec();
        hay.extend_from_slice(START_TERMINATOR.as_bytes());
        hay.extend_from_slice(b"\xc3");
        hay.extend_from_slice(START_TERMINATOR.as_bytes());
        assert_eq!(start_terminator().find(&hay), Some(5));
        assert_eq!(completion_terminator().find(&hay), None);

        let text = format!("result{COMPLETION_TERMINATOR}");
        assert_eq!(completion_terminator().find(text.as_bytes()), Some(6));
    }

    #[test]
    fn completion_marker_len_covers_prefix_id_suffix() {
        let marker = format!("{COMPLETION_PREFIX}{ID}{COMPLETION_SUFFIX}");
        assert_eq!(completion_marker_len(), marker.len());
        assert_eq!(completion_marker_len(), 79);
    }
}
