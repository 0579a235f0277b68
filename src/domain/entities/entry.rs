//! MatchedEntry entity - a completed subtask paired with its instruction

use serde::Serialize;

use crate::domain::value_objects::Mode;

/// Instruction and result of one completed subtask
///
/// Payloads are the raw, still JSON-escaped text between markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedEntry {
    /// Subtask id taken from the completion marker
    pub id: String,
    /// Mode named by the nearest preceding start marker
    pub mode: Mode,
    /// Text between the start marker and its terminator
    pub start_payload: String,
    /// Text between the completion marker and its terminator
    pub end_payload: String,
    /// Absolute file offset of the completion terminator
    pub terminator_offset: u64,
}
