//! ReadWindow entity - one cycle's worth of bytes from a tailed file

use std::borrow::Cow;

/// Contiguous byte range read from a file in one processing cycle
///
/// Offsets reported by the extractor are `read_start + local offset`, so the
/// window keeps the raw bytes; `text()` decodes lazily and never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadWindow {
    bytes: Vec<u8>,
    read_start: u64,
    prior_position: u64,
    truncated: bool,
}

impl ReadWindow {
    pub fn new(bytes: Vec<u8>, read_start: u64, prior_position: u64, truncated: bool) -> Self {
        Self {
            bytes,
            read_start,
            prior_position,
            truncated,
        }
    }

    /// Raw bytes of the window
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Window decoded as UTF-8; invalid sequences become U+FFFD
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Absolute offset of the first byte
    pub fn read_start(&self) -> u64 {
        self.read_start
    }

    /// Cursor position before this read
    pub fn prior_position(&self) -> u64 {
        self.prior_position
    }

    /// Absolute offset just past the last byte read
    pub fn end(&self) -> u64 {
        self.read_start + self.bytes.len() as u64
    }

    /// True when the read cap stopped the window short of the file size
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Convert a local byte offset into an absolute file offset
    pub fn absolute(&self, local: usize) -> u64 {
        self.read_start + local as u64
    }
}
