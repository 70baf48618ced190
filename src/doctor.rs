//! Read-only health report over a manifest and an optional project.
//!
//! The report is plain data: [`build_report`] gathers it and command code
//! decides how to render it (human text or JSON via `serde_json`).
use std::path::PathBuf;

use serde::Serialize;

use crate::error::ScaffoldError;
use crate::manifest::Manifest;
use crate::scaffold::{ProjectLayout, component_sources};

/// Overall outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Every declared source exists.
    Ok,
    /// At least one declared source is missing.
    Error,
}

/// Severity of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// The check passed.
    Ok,
    /// Something is missing but scaffolding can still work.
    Warning,
    /// Informational note.
    Info,
}

/// Complete doctor report.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    /// `ok` unless a declared source is missing.
    pub status: Status,
    /// Counts across all checks.
    pub summary: Summary,
    /// Manifest identity.
    pub manifest: ManifestInfo,
    /// Design-token stylesheet check.
    pub tokens: TokensInfo,
    /// Component source checks.
    pub components: ComponentsInfo,
    /// Project checks; `None` when no project was given.
    pub project: Option<ProjectInfo>,
    /// Warnings and notes, in the order they were found.
    pub warnings: Vec<Warning>,
}

/// Counts across all checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Components inspected.
    pub components_checked: usize,
    /// Declared sources inspected.
    pub sources_checked: usize,
    /// Components with at least one missing source.
    pub errors: usize,
    /// Entries in [`DoctorReport::warnings`] at warning level.
    pub warnings: usize,
    /// Entries in [`DoctorReport::warnings`] at info level.
    pub infos: usize,
}

/// Manifest identity.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestInfo {
    /// Canonical manifest path.
    pub path: PathBuf,
    /// Schema version.
    pub version: u64,
}

/// Tokens file check.
#[derive(Debug, Clone, Serialize)]
pub struct TokensInfo {
    /// Whether `library.tokens_file` is declared.
    pub declared: bool,
    /// Resolved path, when declared.
    pub path: Option<PathBuf>,
    /// `ok`, `warning` (declared but missing) or `info` (not declared).
    pub status: Level,
    /// Whether the file exists; `None` when not declared.
    pub exists: Option<bool>,
}

/// Component source checks.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentsInfo {
    /// Number of declared components.
    pub total: usize,
    /// Components with missing sources, in key order.
    pub missing_sources: Vec<MissingSources>,
}

/// Missing sources of one component.
#[derive(Debug, Clone, Serialize)]
pub struct MissingSources {
    /// Component key.
    pub component: String,
    /// Sources that do not exist.
    pub sources: Vec<PathBuf>,
}

/// Project checks.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectInfo {
    /// Project root.
    pub root: PathBuf,
    /// Whether the root exists.
    pub exists: bool,
    /// Per-directory checks.
    pub paths: Vec<ProjectPath>,
}

/// One project directory check.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectPath {
    /// `templates`, `static` or `docs`.
    pub kind: &'static str,
    /// Absolute directory.
    pub path: PathBuf,
    /// Directory relative to the root, when the root exists.
    pub relative: Option<PathBuf>,
    /// Whether the directory exists.
    pub exists: bool,
    /// `ok` or `warning`.
    pub status: Level,
}

/// A warning or informational note.
#[derive(Debug, Clone, Serialize)]
pub struct Warning {
    /// Check that produced it, e.g. `tokens` or `project_static`.
    pub kind: String,
    /// `warning` or `info`.
    pub level: Level,
    /// Human-readable message.
    pub message: String,
    /// Path involved, if any.
    pub path: Option<PathBuf>,
}

impl DoctorReport {
    /// Whether every declared source exists.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

/// Inspect `manifest` and, when given, the project described by `project`.
///
/// Nothing is written. Only missing component sources make the report
/// fail; a missing tokens file or project directory is a warning.
///
/// # Errors
///
/// Returns [`ScaffoldError::UnsupportedPath`] if a file entry cannot be
/// resolved.
pub fn build_report(
    manifest: &Manifest,
    project: Option<&ProjectLayout>,
) -> Result<DoctorReport, ScaffoldError> {
    let mut warnings = Vec::new();

    let tokens = check_tokens(manifest);
    match tokens.status {
        Level::Warning => warnings.push(Warning {
            kind: "tokens".to_string(),
            level: Level::Warning,
            message: "Tokens file not found".to_string(),
            path: tokens.path.clone(),
        }),
        Level::Info => warnings.push(Warning {
            kind: "tokens".to_string(),
            level: Level::Info,
            message: "Manifest does not declare library.tokens_file".to_string(),
            path: None,
        }),
        Level::Ok => {}
    }

    let mut missing_sources = Vec::new();
    let mut sources_checked = 0;
    for component in manifest.components.values() {
        let sources = component_sources(manifest, component)?;
        sources_checked += sources.len();
        let missing: Vec<PathBuf> = sources.into_iter().filter(|s| !s.exists()).collect();
        if !missing.is_empty() {
            missing_sources.push(MissingSources {
                component: component.key.clone(),
                sources: missing,
            });
        }
    }

    let project = project.map(|layout| check_project(layout, &mut warnings));

    let summary = Summary {
        components_checked: manifest.components.len(),
        sources_checked,
        errors: missing_sources.len(),
        warnings: warnings.iter().filter(|w| w.level == Level::Warning).count(),
        infos: warnings.iter().filter(|w| w.level == Level::Info).count(),
    };

    Ok(DoctorReport {
        status: if summary.errors == 0 {
            Status::Ok
        } else {
            Status::Error
        },
        summary,
        manifest: ManifestInfo {
            path: manifest.path.clone(),
            version: manifest.version,
        },
        tokens,
        components: ComponentsInfo {
            total: manifest.components.len(),
            missing_sources,
        },
        project,
        warnings,
    })
}

fn check_tokens(manifest: &Manifest) -> TokensInfo {
    match manifest.tokens_file() {
        Some(path) => {
            let exists = path.exists();
            TokensInfo {
                declared: true,
                path: Some(path),
                status: if exists { Level::Ok } else { Level::Warning },
                exists: Some(exists),
            }
        }
        None => TokensInfo {
            declared: false,
            path: None,
            status: Level::Info,
            exists: None,
        },
    }
}

fn check_project(layout: &ProjectLayout, warnings: &mut Vec<Warning>) -> ProjectInfo {
    let root_exists = layout.root.exists();
    if !root_exists {
        warnings.push(Warning {
            kind: "project_root".to_string(),
            level: Level::Warning,
            message: "Project root does not exist".to_string(),
            path: Some(layout.root.clone()),
        });
    }

    let mut dirs = vec![
        ("templates", layout.templates_path()),
        ("static", layout.static_path()),
    ];
    if let Some(docs) = layout.docs_path() {
        dirs.push(("docs", docs));
    }

    let paths = dirs
        .into_iter()
        .map(|(kind, path)| {
            let exists = path.exists();
            if !exists {
                warnings.push(Warning {
                    kind: format!("project_{kind}"),
                    level: Level::Warning,
                    message: format!("{kind} directory missing"),
                    path: Some(path.clone()),
                });
            }
            let relative = if root_exists {
                path.strip_prefix(&layout.root).ok().map(PathBuf::from)
            } else {
                None
            };
            ProjectPath {
                kind,
                path,
                relative,
                exists,
                status: if exists { Level::Ok } else { Level::Warning },
            }
        })
        .collect();

    ProjectInfo {
        root: layout.root.clone(),
        exists: root_exists,
        paths,
    }
}
