//! Changelog markdown formatting
//!
//! Payloads arrive still JSON-escaped (they were cut out of a JSON stream),
//! so they are unescaped before rendering. Headers inside payloads are
//! pushed down to `###` so they nest under the document's `##` sections.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::domain::entities::MatchedEntry;

/// Shallowest header level allowed inside a payload
pub const MIN_CONTENT_HEADER_LEVEL: usize = 3;

/// Unescape JSON-escaped payload text into readable markdown.
///
/// Replacement order matters: double-escaped sequences go first so their
/// single-escaped remainder is not unescaped twice.
pub fn unescape(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let unescaped = text
        .replace(r"\\n", "\n")
        .replace(r"\n", "\n")
        .replace(r"\r", "")
        .replace('\r', "")
        .replace(r#"\\""#, "\"")
        .replace(r#"\""#, "\"")
        .replace(r"\t", "\t")
        .replace(r"\\", r"\");

    blank_run_pattern()
        .replace_all(&unescaped, "\n\n\n")
        .trim()
        .to_string()
}

fn blank_run_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\n{4,}").expect("blank-run pattern is valid"))
}

fn header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("header pattern is valid"))
}

/// Raise markdown headers shallower than `min_level` to `min_level`.
///
/// Deeper headers and non-header lines are left alone.
pub fn adjust_header_levels(text: &str, min_level: usize) -> String {
    text.split('\n')
        .map(|line| match header_pattern().captures(line) {
            Some(caps) if caps[1].len() < min_level => {
                format!("{} {}", "#".repeat(min_level), &caps[2])
            }
            _ => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn clean(payload: &str) -> String {
    adjust_header_levels(&unescape(payload), MIN_CONTENT_HEADER_LEVEL)
}

/// Render the changelog document for one entry
pub fn render(entry: &MatchedEntry, completed: DateTime<Utc>) -> String {
    format!(
        "# Part of Changelog\n\
         \n\
         ## Task ID: {id}\n\
         \n\
         **Mode:** {mode}\n\
         **Completed:** {completed}\n\
         \n\
         ---\n\
         \n\
         ## Instruction\n\
         \n\
         {instruction}\n\
         \n\
         ---\n\
         \n\
         ## Result\n\
         \n\
         {result}\n",
        id = entry.id,
        mode = entry.mode,
        completed = completed.format("%Y-%m-%dT%H:%M:%S%.3f UTC"),
        instruction = clean(&entry.start_payload),
        result = clean(&entry.end_payload),
    )
}

/// `changelog_<YYYY-MM-DDTHH-MM-SS-mmm>_UTC_<id>.md`
pub fn file_name(id: &str, at: DateTime<Utc>) -> String {
    format!("changelog_{}_UTC_{}.md", at.format("%Y-%m-%dT%H-%M-%S-%3f"), id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Mode;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 7, 11, 15, 30).unwrap() + chrono::Duration::milliseconds(123)
    }

    #[test]
    fn unescape_newlines_quotes_and_tabs() {
        assert_eq!(unescape(r#"a\nb"#), "a\nb");
        assert_eq!(unescape(r#"a\\nb"#), "a\nb");
        assert_eq!(unescape(r#"say \"hi\""#), "say \"hi\"");
        assert_eq!(unescape(r#"say \\\"hi\\\""#), "say \"hi\"");
        assert_eq!(unescape(r#"col\tcol"#), "col\tcol");
        assert_eq!(unescape(r#"C:\\path"#), r"C:\path");
    }

    #[test]
    fn unescape_drops_carriage_returns() {
        assert_eq!(unescape("a\\r\\nb\r\nc"), "a\nb\nc");
    }

    #[test]
    fn unescape_collapses_blank_runs_and_trims() {
        assert_eq!(unescape(r#"\n\na\n\n\n\n\n\nb\n"#), "a\n\n\nb");
        assert_eq!(unescape(""), "");
    }

    #[test]
    fn headers_are_raised_to_min_level() {
        let text = "# One\n## Two\n### Three\n#### Four\n#NoSpace\nplain # text";
        assert_eq!(
            adjust_header_levels(text, 3),
            "### One\n### Two\n### Three\n#### Four\n#NoSpace\nplain # text"
        );
    }

    #[test]
    fn header_whitespace_is_normalized_when_raised() {
        assert_eq!(adjust_header_levels("#\tTabbed", 3), "### Tabbed");
    }

    #[test]
    fn file_name_uses_millisecond_utc_timestamp() {
        assert_eq!(
            file_name("09d0cb0e-5c00-4df2-90cf-f52c4f85bcfc", at()),
            "changelog_2026-01-07T11-15-30-123_UTC_09d0cb0e-5c00-4df2-90cf-f52c4f85bcfc.md"
        );
    }

    #[test]
    fn render_changelog_markdown() {
        let entry = MatchedEntry {
            id: "11111111-2222-3333-4444-555555555555".to_string(),
            mode: Mode::Code,
            start_payload: r#"# Add login\n\nImplement the \"login\" form.\n- validate input"#
                .to_string(),
            end_payload: r#"## Summary\nAdded `LoginForm`.\n\n\n\n\n### Files\n- src/login.rs"#
                .to_string(),
            terminator_offset: 0,
        };

        insta::assert_snapshot!("changelog_markdown", render(&entry, at()));
    }
}
