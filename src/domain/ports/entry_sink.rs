//! EntrySink port - where matched entries go
//!
//! The core does not decide persistence or deduplication. It hands every
//! matched entry to the sink once, in file order, and ignores the verdict
//! for cursor purposes: a rejected entry is never retried within a cycle
//! and never rolls back the cursor.

use crate::domain::entities::MatchedEntry;

/// Consumer of matched entries
pub trait EntrySink {
    /// Offer an entry; returns `true` if the sink accepted it
    fn emit(&mut self, entry: &MatchedEntry) -> bool;
}

/// Collects every entry (used by `scan` and tests)
impl EntrySink for Vec<MatchedEntry> {
    fn emit(&mut self, entry: &MatchedEntry) -> bool {
        self.push(entry.clone());
        true
    }
}

impl<T: EntrySink + ?Sized> EntrySink for &mut T {
    fn emit(&mut self, entry: &MatchedEntry) -> bool {
        (**self).emit(entry)
    }
}

impl<T: EntrySink + ?Sized> EntrySink for Box<T> {
    fn emit(&mut self, entry: &MatchedEntry) -> bool {
        (**self).emit(entry)
    }
}
