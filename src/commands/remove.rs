//! Command: delete a component's files from a project.
use anyhow::Result;

use crate::cli::{GlobalOpts, RemoveOpts};
use crate::error::GreebleError;
use crate::logging::Logger;
use crate::scaffold::remove_files;

/// Run the remove command.
///
/// Files already gone are reported and skipped, so removing twice succeeds.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded, the component is
/// unknown, the project root is missing, a destination escapes the project,
/// or a file cannot be deleted.
pub fn run(global: &GlobalOpts, opts: &RemoveOpts, log: &Logger) -> Result<()> {
    let manifest = super::load(global, log)?;
    let component = manifest.get(&opts.component).map_err(GreebleError::from)?;
    let root = super::existing_project_root(&opts.layout.project)?;
    let layout = opts.layout.layout(root.clone());

    let plans = super::checked_plan(&manifest, component, &layout)?;

    if opts.dry_run {
        let removal = remove_files(&plans, true).map_err(GreebleError::from)?;
        log.dry_run("Files that would be removed:");
        for path in &removal.removed {
            log.dry_run(&format!("  - {}", super::display_relative(&root, path)));
        }
        return Ok(());
    }

    log.stage(&format!("Removing {}", component.key));
    let removal = remove_files(&plans, false).map_err(GreebleError::from)?;
    log.info(&format!("Removed {} file(s).", removal.removed.len()));
    for path in &removal.removed {
        log.info(&format!("  - {}", super::display_relative(&root, path)));
    }
    log.list(
        "Skipped missing files:",
        removal
            .missing
            .iter()
            .map(|path| super::display_relative(&root, path)),
    );
    log.log_location();
    Ok(())
}
