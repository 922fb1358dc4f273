use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Result type for file operations
pub type FileOpResult<T> = Result<T, FileOpError>;

/// Error types for file operations
#[derive(Debug)]
pub enum FileOpError {
    CopyFailed(String),
    RemoveFailed(String),
    IoError(std::io::Error),
}

impl std::fmt::Display for FileOpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOpError::CopyFailed(msg) => write!(f, "Copy failed: {}", msg),
            FileOpError::RemoveFailed(msg) => write!(f, "Remove failed: {}", msg),
            FileOpError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for FileOpError {}

impl From<std::io::Error> for FileOpError {
    fn from(error: std::io::Error) -> Self {
        FileOpError::IoError(error)
    }
}

/// Copy `src` to `dest` unless the destination already exists.
///
/// Returns whether a copy actually happened, so a re-run over an already
/// materialized tree is a cheap no-op and never overwrites anything.
pub fn copy_file_if_absent(src: &Path, dest: &Path) -> FileOpResult<bool> {
    if dest.exists() {
        return Ok(false);
    }
    if let Err(e) = fs::copy(src, dest) {
        return Err(FileOpError::CopyFailed(format!(
            "Failed to copy {:?} to {:?}: {}",
            src, dest, e
        )));
    }
    Ok(true)
}

/// Move a file from source to destination using copy + remove pattern
/// for cross-drive compatibility.
pub fn move_file(src: &Path, dest: &Path) -> FileOpResult<()> {
    if let Err(e) = fs::copy(src, dest) {
        error!("Failed to copy file from {:?} to {:?}: {}", src, dest, e);
        return Err(FileOpError::CopyFailed(format!(
            "Failed to copy from {:?} to {:?}: {}",
            src, dest, e
        )));
    }

    if let Err(e) = fs::remove_file(src) {
        error!("Failed to remove original file {:?} after copy: {}", src, e);
        // Try to clean up the destination file
        let _ = fs::remove_file(dest);
        return Err(FileOpError::RemoveFailed(format!(
            "Failed to remove original file {:?}: {}",
            src, e
        )));
    }

    Ok(())
}

/// Delete a batch of files, reporting each failure and carrying on with the
/// rest. Returns the number actually deleted.
pub fn remove_files(paths: &[PathBuf]) -> usize {
    let mut deleted = 0;
    for path in paths {
        match fs::remove_file(path) {
            Ok(()) => {
                info!("Deleted {:?}", path);
                deleted += 1;
            }
            Err(e) => error!("Failed to delete {:?}: {}", path, e),
        }
    }
    deleted
}
