//! FileSystem port - abstraction over file I/O operations
//!
//! Config files are read, written and listed (for file name completion)
//! through this trait so the engine can run against an in-memory file system.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for file system operations
pub type FsResult<T> = Result<T, FsError>;

/// File system operation errors
#[derive(Error, Debug)]
pub enum FsError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("I/O error for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    /// Attach the path an I/O error occurred for
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            _ => FsError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

/// Abstract file system interface
///
/// Implementations:
/// - `LocalFs` - standard file I/O
/// - `MemoryFs` - in-memory, for tests and embedding
pub trait FileSystem {
    /// Read file content as string
    fn read(&self, path: &Path) -> FsResult<String>;

    /// Write content to a file atomically. The parent directory must exist.
    fn write(&self, path: &Path, content: &str) -> FsResult<()>;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Check if a file exists and the current user may write to it
    fn is_writable_file(&self, path: &Path) -> bool;

    /// Create a directory and its parents, new directories are only accessible by the owner
    fn create_dir_all_private(&self, path: &Path) -> FsResult<()>;

    /// Names of the entries of a directory, unsorted
    fn list_dir(&self, path: &Path) -> FsResult<Vec<String>>;

    /// Expand a leading `~` to the home directory
    fn expand_home(&self, path: &Path) -> PathBuf;
}
