//! FileSource port - size queries and positioned reads on tailed files
//!
//! The tailing services only need two operations: how big is the file now,
//! and give me `len` bytes starting at `offset`. Keeping them behind a trait
//! lets the core run against in-memory sources in tests.

use std::path::{Path, PathBuf};

/// Result type for file source operations
pub type FsResult<T> = Result<T, FsError>;

/// File source operation errors
#[derive(Debug)]
pub enum FsError {
    /// File not found
    NotFound(PathBuf),
    /// Permission denied
    PermissionDenied(PathBuf),
    /// I/O error
    Io(PathBuf, std::io::Error),
}

impl FsError {
    /// Classify an I/O error raised while accessing `path`
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            _ => FsError::Io(path.to_path_buf(), err),
        }
    }

    /// Path the failed operation was about
    pub fn path(&self) -> &Path {
        match self {
            FsError::NotFound(path) | FsError::PermissionDenied(path) | FsError::Io(path, _) => {
                path
            }
        }
    }
}

impl std::fmt::Display for FsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FsError::NotFound(path) => write!(f, "File not found: {}", path.display()),
            FsError::PermissionDenied(path) => {
                write!(f, "Permission denied: {}", path.display())
            }
            FsError::Io(path, err) => write!(f, "I/O error on {}: {}", path.display(), err),
        }
    }
}

impl std::error::Error for FsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FsError::Io(_, err) => Some(err),
            _ => None,
        }
    }
}

/// Read access to growing files
///
/// Implementations:
/// - `LocalFs` - positioned reads on the local disk
/// - `MemorySource` - in-memory buffers for tests
pub trait FileSource {
    /// Current size of the file in bytes
    fn size(&self, path: &Path) -> FsResult<u64>;

    /// Read up to `len` bytes starting at `offset`.
    ///
    /// Returns fewer bytes only when the file ends first.
    fn read_range(&self, path: &Path, offset: u64, len: u64) -> FsResult<Vec<u8>>;
}

impl<T: FileSource + ?Sized> FileSource for &T {
    fn size(&self, path: &Path) -> FsResult<u64> {
        (**self).size(path)
    }

    fn read_range(&self, path: &Path, offset: u64, len: u64) -> FsResult<Vec<u8>> {
        (**self).read_range(path, offset, len)
    }
}
