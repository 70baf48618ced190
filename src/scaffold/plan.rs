//! Copy plan construction and the project sandbox check.
use std::fs;
use std::io;
use std::path::{Component as PathComponent, Path, PathBuf};

use crate::error::ScaffoldError;
use crate::manifest::{Component, Manifest, Namespace};

use super::resolve::resolve_entry;
use super::{CopyPlan, ProjectLayout};

/// Expand `component` into copy plans for `layout`, in manifest order.
///
/// Doc entries are skipped unless the layout includes docs.
///
/// # Errors
///
/// Returns [`ScaffoldError::UnsupportedPath`] for an unknown namespace and
/// [`ScaffoldError::SourceMissing`] when a resolved source does not exist.
pub fn build_copy_plan(
    manifest: &Manifest,
    component: &Component,
    layout: &ProjectLayout,
) -> Result<Vec<CopyPlan>, ScaffoldError> {
    let mut plans = Vec::with_capacity(component.files.len());
    for entry in &component.files {
        let resolved = resolve_entry(manifest, component, entry, layout)?;
        if resolved.namespace == Namespace::Docs && !layout.include_docs {
            continue;
        }
        if !resolved.source.exists() {
            return Err(ScaffoldError::SourceMissing {
                path: resolved.source,
            });
        }
        plans.push(CopyPlan {
            source: resolved.source,
            destination: resolved.destination,
        });
    }
    Ok(plans)
}

/// Fail unless every plan destination lies at or beneath `project_root`.
///
/// # Errors
///
/// Returns [`ScaffoldError::OutsideProject`] naming the first escaping
/// destination.
pub fn ensure_within_project(project_root: &Path, plans: &[CopyPlan]) -> Result<(), ScaffoldError> {
    ensure_paths_within(project_root, plans.iter().map(|p| p.destination.as_path()))
}

/// Fail unless every path in `paths` lies at or beneath `project_root`.
///
/// Both sides are compared after [`resolve_path`], so symlinks and `..`
/// cannot be used to escape.
///
/// # Errors
///
/// Returns [`ScaffoldError::OutsideProject`] naming the first escaping path.
pub fn ensure_paths_within<'a>(
    project_root: &Path,
    paths: impl IntoIterator<Item = &'a Path>,
) -> Result<(), ScaffoldError> {
    let root = resolve_path(project_root)?;
    for path in paths {
        let resolved = resolve_path(path)?;
        if !resolved.starts_with(&root) {
            return Err(ScaffoldError::OutsideProject { path: resolved });
        }
    }
    Ok(())
}

/// Symbolic links followed by [`resolve_path`] before it gives up.
const MAX_SYMLINK_HOPS: usize = 40;

/// Canonical form of `path`, which need not exist.
///
/// Components are applied one at a time: while the prefix exists it is
/// canonicalized (following symlinks), and past that point the remaining
/// components are applied lexically with `..` popping. A dangling symlink
/// is still followed to wherever it points.
///
/// # Errors
///
/// Returns [`ScaffoldError::Io`] if a relative path cannot be made absolute
/// or a symlink chain does not terminate.
pub fn resolve_path(path: &Path) -> Result<PathBuf, ScaffoldError> {
    resolve_with_hops(path, 0)
}

fn resolve_with_hops(path: &Path, hops: usize) -> Result<PathBuf, ScaffoldError> {
    let absolute = std::path::absolute(path).map_err(ScaffoldError::io("resolve", path))?;
    let mut resolved = PathBuf::new();
    for part in absolute.components() {
        match part {
            PathComponent::Prefix(_) | PathComponent::RootDir => resolved.push(part),
            PathComponent::CurDir => {}
            PathComponent::ParentDir => {
                resolved.pop();
            }
            PathComponent::Normal(name) => {
                resolved.push(name);
                if let Ok(canonical) = dunce::canonicalize(&resolved) {
                    resolved = canonical;
                } else if let Some(target) = dangling_target(&resolved)? {
                    if hops >= MAX_SYMLINK_HOPS {
                        return Err(ScaffoldError::Io {
                            action: "resolve",
                            path: path.to_path_buf(),
                            source: io::Error::other("too many levels of symbolic links"),
                        });
                    }
                    resolved = resolve_with_hops(&target, hops + 1)?;
                }
            }
        }
    }
    Ok(resolved)
}

/// Where `link` points, when it is a symlink; relative targets are taken
/// from the link's directory.
fn dangling_target(link: &Path) -> Result<Option<PathBuf>, ScaffoldError> {
    let is_link = fs::symlink_metadata(link).is_ok_and(|meta| meta.file_type().is_symlink());
    if !is_link {
        return Ok(None);
    }
    let target = fs::read_link(link).map_err(ScaffoldError::io("read link", link))?;
    Ok(Some(link.parent().map_or_else(|| target.clone(), |dir| dir.join(&target))))
}
