//! File-system helpers shared by the executor, backups and the starter.
use std::fs;
use std::path::Path;

use crate::error::ScaffoldError;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns [`ScaffoldError::Io`] if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<(), ScaffoldError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(ScaffoldError::io("create directory", parent))?;
    }
    Ok(())
}

/// Whether anything, including a dangling symlink, sits at `path`.
#[must_use]
pub fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Copy `source` to `destination`, preserving permissions and the
/// modification time. Missing parent directories are created.
///
/// # Errors
///
/// Returns [`ScaffoldError::Io`] if any step fails.
pub fn copy_file(source: &Path, destination: &Path) -> Result<(), ScaffoldError> {
    ensure_parent_dir(destination)?;
    fs::copy(source, destination).map_err(ScaffoldError::io("copy to", destination))?;

    let modified = fs::metadata(source)
        .and_then(|meta| meta.modified())
        .map_err(ScaffoldError::io("read metadata of", source))?;
    // A read-only copy cannot be opened for writing; on Unix the owner may
    // still set times through a read-only handle.
    let file = fs::File::options()
        .write(true)
        .open(destination)
        .or_else(|_| fs::File::open(destination))
        .map_err(ScaffoldError::io("open", destination))?;
    file.set_modified(modified)
        .map_err(ScaffoldError::io("set modification time of", destination))?;
    Ok(())
}

/// Write `contents` to `destination`, creating missing parent directories.
///
/// # Errors
///
/// Returns [`ScaffoldError::Io`] if the directory or the file cannot be
/// written.
pub fn write_file(destination: &Path, contents: &[u8]) -> Result<(), ScaffoldError> {
    ensure_parent_dir(destination)?;
    fs::write(destination, contents).map_err(ScaffoldError::io("write", destination))
}
