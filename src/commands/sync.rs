//! Command: re-copy a component, overwriting what the project has.
use std::path::PathBuf;

use anyhow::Result;

use crate::cli::{GlobalOpts, SyncOpts};
use crate::error::GreebleError;
use crate::logging::Logger;
use crate::scaffold::{
    CopyPlan, DEFAULT_BACKUP_SUFFIX, backup_existing_files, execute_plan, planned_backup_path,
};

/// Run the sync command.
///
/// With `--backup`, every destination that already exists is copied to a
/// fresh `.bak` name before it is overwritten.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded, the component is
/// unknown, the project root is missing, a destination escapes the project,
/// or a copy fails.
pub fn run(global: &GlobalOpts, opts: &SyncOpts, log: &Logger) -> Result<()> {
    let manifest = super::load(global, log)?;
    let component = manifest.get(&opts.component).map_err(GreebleError::from)?;
    let root = super::existing_project_root(&opts.layout.project)?;
    let layout = opts.layout.layout(root.clone());

    let plans = super::checked_plan(&manifest, component, &layout)?;

    if opts.dry_run {
        super::log_plan(log, "Files to sync:", &plans);
        if opts.backup {
            log.list(
                "Backups that would be created:",
                backup_preview(&plans)
                    .iter()
                    .map(|path| super::display_relative(&root, path)),
            );
        }
        return Ok(());
    }

    log.stage(&format!("Syncing {}", component.key));
    let backups = if opts.backup {
        backup_existing_files(&root, &plans, DEFAULT_BACKUP_SUFFIX).map_err(GreebleError::from)?
    } else {
        Vec::new()
    };
    let written = execute_plan(&plans, true, false).map_err(GreebleError::from)?;

    log.info(&format!("Synced {} file(s).", written.len()));
    log.list(
        &format!("Created {} backup file(s):", backups.len()),
        backups
            .iter()
            .map(|path| super::display_relative(&root, path)),
    );
    log.log_location();
    Ok(())
}

/// Backup names a `--backup` run would create right now, in plan order.
#[must_use]
pub fn backup_preview(plans: &[CopyPlan]) -> Vec<PathBuf> {
    plans
        .iter()
        .map(|plan| plan.destination.as_path())
        .filter(|path| path.exists())
        .filter_map(|path| planned_backup_path(path, DEFAULT_BACKUP_SUFFIX))
        .collect()
}
