//! FileCursor entity - how far a tailed file has been consumed

/// Read position of one tailed file
///
/// `last_position` only moves forward while the file keeps growing.
/// `pending_start` remembers the earliest marker that could not be resolved
/// yet, so the next window reaches back far enough to see it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileCursor {
    last_position: u64,
    pending_start: Option<u64>,
}

impl FileCursor {
    /// Cursor at a baseline offset with nothing pending
    pub fn at(baseline: u64) -> Self {
        Self {
            last_position: baseline,
            pending_start: None,
        }
    }

    /// Absolute offset up to which content has been consumed
    pub fn last_position(&self) -> u64 {
        self.last_position
    }

    /// Earliest unresolved marker offset, if any
    pub fn pending_start(&self) -> Option<u64> {
        self.pending_start
    }

    /// Record an unresolved marker; the earliest offset wins.
    ///
    /// Returns `true` if the stored offset changed.
    pub fn set_pending(&mut self, offset: u64) -> bool {
        match self.pending_start {
            Some(existing) if existing <= offset => false,
            _ => {
                self.pending_start = Some(offset);
                true
            }
        }
    }

    pub fn clear_pending(&mut self) {
        self.pending_start = None;
    }

    /// Move the consumed position. Unconditional: callers decide the value.
    pub fn advance(&mut self, new_position: u64) {
        self.last_position = new_position;
    }
}
