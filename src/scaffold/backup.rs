//! Backups of destinations about to be overwritten.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::ScaffoldError;

use super::CopyPlan;
use super::fs::{copy_file, is_occupied};
use super::plan::ensure_paths_within;

/// Suffix appended to backup file names.
pub const DEFAULT_BACKUP_SUFFIX: &str = ".bak";

/// First free backup name for `path`.
///
/// Candidates are `<name><suffix>`, then `<name><suffix>1`,
/// `<name><suffix>2`, and so on. `exists` decides whether a candidate is
/// taken, which keeps the search free of hidden state.
///
/// Returns `None` only if `path` has no file name or every numbered
/// candidate is taken.
#[must_use]
pub fn next_backup_path(
    path: &Path,
    suffix: &str,
    exists: impl Fn(&Path) -> bool,
) -> Option<PathBuf> {
    let name = path.file_name()?;
    let candidate = |index: Option<u64>| {
        let mut file_name = OsString::from(name);
        file_name.push(suffix);
        if let Some(index) = index {
            file_name.push(index.to_string());
        }
        path.with_file_name(file_name)
    };

    let first = candidate(None);
    if !exists(&first) {
        return Some(first);
    }
    (1..=u64::MAX)
        .map(|index| candidate(Some(index)))
        .find(|numbered| !exists(numbered))
}

/// Backup name [`backup_existing_files`] would pick for `destination` right
/// now. Dangling symlinks count as taken.
#[must_use]
pub fn planned_backup_path(destination: &Path, suffix: &str) -> Option<PathBuf> {
    next_backup_path(destination, suffix, is_occupied)
}

/// Copy every existing plan destination to its next free backup name.
///
/// Destinations that do not exist yet are skipped. Every backup name must
/// resolve inside `project_root`. Returns the backup paths in plan order.
///
/// # Errors
///
/// Returns [`ScaffoldError::OutsideProject`] when a backup name escapes the
/// project, or [`ScaffoldError::Io`] when a backup cannot be written.
pub fn backup_existing_files(
    project_root: &Path,
    plans: &[CopyPlan],
    suffix: &str,
) -> Result<Vec<PathBuf>, ScaffoldError> {
    let mut backups = Vec::new();
    for plan in plans {
        let destination = &plan.destination;
        if !destination.exists() {
            continue;
        }
        let backup = planned_backup_path(destination, suffix).ok_or_else(|| ScaffoldError::Io {
            action: "choose a backup name for",
            path: destination.clone(),
            source: std::io::Error::other("no free backup name"),
        })?;
        ensure_paths_within(project_root, [backup.as_path()])?;
        copy_file(destination, &backup)?;
        tracing::debug!("backed up {} -> {}", destination.display(), backup.display());
        backups.push(backup);
    }
    Ok(backups)
}
