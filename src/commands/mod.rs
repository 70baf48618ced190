//! Top-level subcommand orchestration.
//!
//! Each submodule owns one subcommand. Handlers load the manifest, drive the
//! scaffold engine, and report through the [`Logger`]; typed engine errors
//! are converted to [`anyhow::Error`] here and mapped to exit codes in
//! `main`.
pub mod add;
pub mod doctor;
pub mod list;
pub mod new;
pub mod remove;
pub mod sync;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::error::{GreebleError, ScaffoldError};
use crate::logging::Logger;
use crate::manifest::{Component, MANIFEST_FILE_NAME, Manifest, load_manifest};
use crate::scaffold::{
    CopyPlan, ProjectLayout, build_copy_plan, ensure_within_project, resolve_path,
};

/// Environment variable naming the manifest path.
pub const MANIFEST_ENV: &str = "GREEBLE_MANIFEST";

/// Resolve the manifest path.
///
/// Order: `--manifest`, the `GREEBLE_MANIFEST` environment variable, a
/// manifest above the executable (`target/<profile>/` or `bin/` layouts),
/// then the current directory. The last candidate is returned even when it
/// does not exist so loading reports a clear "not found".
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn resolve_manifest_path(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(ref path) = global.manifest {
        return Ok(path.clone());
    }

    if let Ok(path) = std::env::var(MANIFEST_ENV)
        && !path.is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if let Ok(exe) = std::env::current_exe()
        && let Some(parent) = exe.parent()
    {
        let candidates = [
            parent.join("../.."), // target/<profile>/ -> library root
            parent.join(".."),    // bin/ -> install prefix
        ];
        for candidate in &candidates {
            let path = candidate.join(MANIFEST_FILE_NAME);
            if path.is_file() {
                return Ok(dunce::canonicalize(&path).unwrap_or(path));
            }
        }
    }

    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    Ok(cwd.join(MANIFEST_FILE_NAME))
}

/// Resolve and load the manifest for a command.
///
/// # Errors
///
/// Returns a [`GreebleError::Manifest`] when loading or validation fails.
pub fn load(global: &GlobalOpts, log: &Logger) -> Result<Manifest> {
    let path = resolve_manifest_path(global)?;
    log.debug(&format!("manifest: {}", path.display()));
    let manifest = load_manifest(&path).map_err(GreebleError::from)?;
    log.debug(&format!(
        "loaded {} component(s) from {}",
        manifest.components.len(),
        manifest.root.display()
    ));
    Ok(manifest)
}

/// Absolute form of a project root that must already exist.
///
/// # Errors
///
/// Returns a [`ScaffoldError::ProjectRootMissing`] when `project` is not an
/// existing directory.
pub fn existing_project_root(project: &Path) -> Result<PathBuf> {
    if !project.is_dir() {
        return Err(GreebleError::from(ScaffoldError::ProjectRootMissing {
            path: project.to_path_buf(),
        })
        .into());
    }
    Ok(absolute_root(project)?)
}

/// Absolute, symlink-free form of `project`, which need not exist.
///
/// # Errors
///
/// Returns a [`ScaffoldError::Io`] if the path cannot be made absolute.
pub fn absolute_root(project: &Path) -> Result<PathBuf, GreebleError> {
    Ok(resolve_path(project)?)
}

/// Build the copy plan for `component` and prove it stays inside the
/// project. Every mutating command goes through here first.
///
/// # Errors
///
/// Returns a [`GreebleError::Scaffold`] when a source is missing, an entry
/// is unsupported, or a destination escapes the project root.
pub fn checked_plan(
    manifest: &Manifest,
    component: &Component,
    layout: &ProjectLayout,
) -> Result<Vec<CopyPlan>, GreebleError> {
    let plans = build_copy_plan(manifest, component, layout)?;
    ensure_within_project(&layout.root, &plans)?;
    Ok(plans)
}

/// `path` relative to `root` for display, or `path` itself.
#[must_use]
pub fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Log each plan as `source -> destination` under `header`.
pub fn log_plan(log: &Logger, header: &str, plans: &[CopyPlan]) {
    log.dry_run(header);
    for plan in plans {
        log.dry_run(&format!(
            "  - {} -> {}",
            plan.source.display(),
            plan.destination.display()
        ));
    }
}
