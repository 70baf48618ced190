//! Command: scaffold a starter project.
use anyhow::Result;

use crate::cli::{GlobalOpts, NewOpts};
use crate::error::{GreebleError, ScaffoldError};
use crate::logging::Logger;
use crate::starter::{StarterOptions, ensure_destination_ready, scaffold_starter};

/// Key files shown after a successful scaffold.
const KEY_FILES_SHOWN: usize = 10;

/// Run the new command.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded, the destination is a
/// file or a non-empty directory without `--force`, a starter component is
/// missing, or a write fails.
pub fn run(global: &GlobalOpts, opts: &NewOpts, log: &Logger) -> Result<()> {
    let manifest = super::load(global, log)?;
    let root = super::absolute_root(&opts.project)?;
    ensure_destination_ready(&root, opts.force).map_err(GreebleError::from)?;

    if !opts.dry_run {
        std::fs::create_dir_all(&root)
            .map_err(ScaffoldError::io("create directory", &root))
            .map_err(GreebleError::from)?;
    }

    let options = StarterOptions {
        project_root: root.clone(),
        include_docs: opts.include_docs,
        docs_dir: Some(opts.docs.clone()),
        force: opts.force,
        dry_run: opts.dry_run,
    };
    let report = scaffold_starter(&manifest, &options).map_err(GreebleError::from)?;
    let files = report.all_files();

    if opts.dry_run {
        log.dry_run("Starter files that would be created:");
        for path in &files {
            log.dry_run(&format!("  - {}", super::display_relative(&root, path)));
        }
        return Ok(());
    }

    log.stage(&format!("Starter project created at {}", root.display()));
    log.info(&format!("  + {} starter files", report.project_files.len()));
    log.info(&format!("  + {} component assets", report.component_files.len()));
    log.list(
        "Key files:",
        files
            .iter()
            .take(KEY_FILES_SHOWN)
            .map(|path| super::display_relative(&root, path)),
    );
    if files.len() > KEY_FILES_SHOWN {
        log.info(&format!("  ... {} more", files.len() - KEY_FILES_SHOWN));
    }
    log.log_location();
    Ok(())
}
