//! Property tests for reads over a file that grows in arbitrary pieces.

use std::fs;

use proptest::prelude::*;
use tempfile::tempdir;

use subtrail::domain::services::WindowLimits;
use subtrail::{LocalFs, MatchedEntry, Mode, TailOptions, TailUseCase};

use crate::common::{append, completion, start, subtask_id, HISTORY_FILE};

fn mode() -> impl Strategy<Value = Mode> {
    prop_oneof![
        Just(Mode::Ask),
        Just(Mode::Code),
        Just(Mode::Debug),
        Just(Mode::Architect),
    ]
}

fn text(max: usize) -> impl Strategy<Value = String> {
    proptest::string::string_regex(&format!("[A-Za-z0-9 ]{{1,{max}}}")).unwrap()
}

/// (mode, instruction, result, filler after the pair)
fn subtask() -> impl Strategy<Value = (Mode, String, String, String)> {
    (mode(), text(40), text(40), text(300))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Each completed subtask is emitted exactly once, in order,
    /// regardless of where the writer's appends split the stream.
    #[test]
    fn property_split_appends_emit_each_subtask_once(
        subtasks in proptest::collection::vec(subtask(), 1..6),
        cuts in proptest::collection::vec(any::<prop::sample::Index>(), 0..12),
    ) {
        let mut stream = String::new();
        let mut expected = Vec::new();
        for (n, (mode, instruction, result, filler)) in subtasks.iter().enumerate() {
            let id = subtask_id(n);
            stream.push_str(&start(*mode, instruction));
            stream.push_str(&filler);
            stream.push_str(&completion(&id, result));
            expected.push((id, *mode, instruction.clone(), result.clone()));
        }
        let bytes = stream.as_bytes();

        let mut cut_points: Vec<usize> = cuts.iter().map(|i| i.index(bytes.len())).collect();
        cut_points.push(bytes.len());
        cut_points.sort_unstable();
        cut_points.dedup();

        let dir = tempdir().unwrap();
        let path = dir.path().join(HISTORY_FILE);
        fs::write(&path, b"").unwrap();

        let options = TailOptions {
            limits: WindowLimits { max_read_bytes: 1024, overlap_bytes: 128 },
            history_chunk_bytes: 256,
        };
        let mut tail = TailUseCase::new(LocalFs::new(), Vec::<MatchedEntry>::new(), options);
        tail.initialize(&path).unwrap();

        let mut written = 0;
        for cut in cut_points {
            append(&path, &bytes[written..cut]);
            written = cut;
            let report = tail.on_file_ready(&path);
            prop_assert!(report.error.is_none());
        }

        let emitted: Vec<_> = tail
            .sink()
            .iter()
            .map(|e| (e.id.clone(), e.mode, e.start_payload.clone(), e.end_payload.clone()))
            .collect();
        prop_assert_eq!(emitted, expected);
        prop_assert_eq!(
            tail.tracker().cursor(&path).unwrap().last_position(),
            bytes.len() as u64
        );
    }

    /// PROPERTY: Content present before the first observation never surfaces.
    #[test]
    fn property_baselined_content_is_never_emitted(
        before in proptest::collection::vec(subtask(), 1..4),
        after in proptest::collection::vec(subtask(), 0..3),
    ) {
        let dir = tempdir().unwrap();
        let path = dir.path().join(HISTORY_FILE);

        let mut old = String::new();
        for (n, (mode, instruction, result, filler)) in before.iter().enumerate() {
            old.push_str(&start(*mode, instruction));
            old.push_str(filler);
            old.push_str(&completion(&subtask_id(n), result));
        }
        fs::write(&path, old.as_bytes()).unwrap();

        let mut tail = TailUseCase::new(LocalFs::new(), Vec::<MatchedEntry>::new(), TailOptions::default());
        prop_assert!(tail.on_file_ready(&path).baselined);

        let mut new_ids = Vec::new();
        for (n, (mode, instruction, result, filler)) in after.iter().enumerate() {
            let id = subtask_id(100 + n);
            append(&path, start(*mode, instruction).as_bytes());
            append(&path, filler.as_bytes());
            append(&path, completion(&id, result).as_bytes());
            new_ids.push(id);
            tail.on_file_ready(&path);
        }
        tail.on_file_ready(&path);

        let emitted: Vec<_> = tail.sink().iter().map(|e| e.id.clone()).collect();
        prop_assert_eq!(emitted, new_ids);
    }
}
