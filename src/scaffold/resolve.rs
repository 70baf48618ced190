//! Map manifest entries to library sources and project destinations.
use std::path::PathBuf;

use crate::error::ScaffoldError;
use crate::manifest::{Component, Manifest, Namespace};

use super::ProjectLayout;

/// Directory, relative to the manifest root, holding one folder per component.
pub const COMPONENTS_DIR: &str = "packages/greeble_components/components";

/// A manifest entry resolved against a library and a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// Namespace selected by the entry's first segment.
    pub namespace: Namespace,
    /// Absolute source path inside the library (may not exist).
    pub source: PathBuf,
    /// Absolute destination path inside the project.
    pub destination: PathBuf,
}

/// Asset folder of `component` inside the library.
#[must_use]
pub fn component_dir(manifest: &Manifest, component: &Component) -> PathBuf {
    manifest.root.join(COMPONENTS_DIR).join(&component.key)
}

/// Split `entry` into its namespace and the remainder after the first `/`.
fn split_entry<'a>(
    component: &Component,
    entry: &'a str,
) -> Result<(Namespace, &'a str), ScaffoldError> {
    entry
        .split_once('/')
        .and_then(|(first, rest)| Namespace::from_segment(first).map(|ns| (ns, rest)))
        .filter(|(_, rest)| !rest.is_empty())
        .ok_or_else(|| ScaffoldError::UnsupportedPath {
            entry: entry.to_string(),
            component: component.key.clone(),
        })
}

/// Resolve the library source of one entry.
///
/// Template and static entries live in the component's asset folder. The
/// nested path is preferred; when it is absent but a file of the same name
/// sits directly under the namespace folder, that flat file is used.
/// Doc entries resolve against the manifest root.
///
/// # Errors
///
/// Returns [`ScaffoldError::UnsupportedPath`] for an unknown namespace.
pub fn resolve_source(
    manifest: &Manifest,
    component: &Component,
    entry: &str,
) -> Result<(Namespace, PathBuf), ScaffoldError> {
    let (namespace, rest) = split_entry(component, entry)?;
    let source = match namespace {
        Namespace::Docs => manifest.root.join(entry),
        Namespace::Templates | Namespace::Static => {
            let base = component_dir(manifest, component).join(namespace.as_str());
            let nested = base.join(rest);
            let flat = rest.rsplit('/').next().map(|name| base.join(name));
            match flat {
                Some(flat) if !nested.exists() && flat.is_file() => flat,
                _ => nested,
            }
        }
    };
    Ok((namespace, source))
}

/// Resolve one entry to a source and a destination under `layout`.
///
/// # Errors
///
/// Returns [`ScaffoldError::UnsupportedPath`] for an unknown namespace.
pub fn resolve_entry(
    manifest: &Manifest,
    component: &Component,
    entry: &str,
    layout: &ProjectLayout,
) -> Result<ResolvedEntry, ScaffoldError> {
    let (namespace, source) = resolve_source(manifest, component, entry)?;
    let (_, rest) = split_entry(component, entry)?;
    let destination = match namespace {
        Namespace::Templates => layout.templates_path().join(rest),
        Namespace::Static => layout.static_path().join(rest),
        Namespace::Docs => layout
            .docs_dir
            .as_deref()
            .map_or_else(|| layout.root.join(entry), |dir| layout.root.join(dir).join(rest)),
    };
    Ok(ResolvedEntry {
        namespace,
        source,
        destination,
    })
}

/// Every declared source of `component`, in manifest order, whether or not
/// it exists. Used by health checks.
///
/// # Errors
///
/// Returns [`ScaffoldError::UnsupportedPath`] for an unknown namespace.
pub fn component_sources(
    manifest: &Manifest,
    component: &Component,
) -> Result<Vec<PathBuf>, ScaffoldError> {
    component
        .files
        .iter()
        .map(|entry| resolve_source(manifest, component, entry).map(|(_, source)| source))
        .collect()
}
