//! Local File System Implementation
//!
//! Implements the FileSource port for local disk files, plus the atomic
//! write used for changelog output.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::domain::ports::{FileSource, FsError, FsResult};
use crate::error::SubtrailResult;

/// Local file system implementation
///
/// Positioned reads for tailing, atomic writes for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    /// Create a new LocalFs instance
    pub fn new() -> Self {
        Self
    }

    /// Atomic write (temp file in the same directory, then rename)
    pub fn write_atomic(&self, path: &Path, content: &str) -> SubtrailResult<()> {
        atomic_write(path, content.as_bytes())
    }
}

impl FileSource for LocalFs {
    fn size(&self, path: &Path) -> FsResult<u64> {
        std::fs::metadata(path)
            .map(|meta| meta.len())
            .map_err(|e| FsError::from_io(path, e))
    }

    fn read_range(&self, path: &Path, offset: u64, len: u64) -> FsResult<Vec<u8>> {
        let mut file = File::open(path).map_err(|e| FsError::from_io(path, e))?;
        file.seek(SeekFrom::Start(offset))
            .map_err(|e| FsError::from_io(path, e))?;

        let mut buf = Vec::with_capacity(usize::try_from(len).unwrap_or(0).min(1 << 20));
        file.take(len)
            .read_to_end(&mut buf)
            .map_err(|e| FsError::from_io(path, e))?;
        Ok(buf)
    }
}

/// Write content to a file atomically
///
/// Creates parent directories, writes a sibling temp file and renames it
/// over the target so readers never observe a partial file.
pub fn atomic_write(path: &Path, content: &[u8]) -> SubtrailResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
