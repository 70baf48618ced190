//! Command: copy a component's files into a project.
use anyhow::Result;

use crate::cli::{AddOpts, GlobalOpts};
use crate::error::GreebleError;
use crate::logging::Logger;
use crate::scaffold::execute_plan;

/// Run the add command.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded, the component is
/// unknown, the project root is missing, a destination escapes the project,
/// or a destination already exists without `--force`.
pub fn run(global: &GlobalOpts, opts: &AddOpts, log: &Logger) -> Result<()> {
    let manifest = super::load(global, log)?;
    let component = manifest.get(&opts.component).map_err(GreebleError::from)?;
    let root = super::existing_project_root(&opts.layout.project)?;
    let layout = opts.layout.layout(root.clone());

    let plans = super::checked_plan(&manifest, component, &layout)?;

    if opts.dry_run {
        super::log_plan(log, "Files to copy:", &plans);
        return Ok(());
    }

    log.stage(&format!("Adding {}", component.key));
    let written = execute_plan(&plans, opts.force, false).map_err(GreebleError::from)?;
    log.list(
        &format!("Copied {} file(s):", written.len()),
        written.iter().map(|path| super::display_relative(&root, path)),
    );
    log.log_location();
    Ok(())
}
