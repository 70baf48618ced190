//! Copy plans: resolution, sandboxing and execution.
//!
//! The engine is split into small layers that run in order:
//!
//! - **[`resolve`]**: map one manifest entry to a `(source, destination)` pair
//! - **[`plan`]**: expand a component into a [`CopyPlan`] list and prove it
//!   stays inside the project root
//! - **[`execute`]**: copy or remove the planned files
//! - **[`backup`]**: keep `.bak` copies of files about to be overwritten
//!
//! Every mutating entry point is preceded by
//! [`plan::ensure_within_project`]; nothing here writes outside the project.
pub mod backup;
pub mod execute;
pub mod fs;
pub mod plan;
pub mod resolve;

use std::path::PathBuf;

pub use backup::{
    DEFAULT_BACKUP_SUFFIX, backup_existing_files, next_backup_path, planned_backup_path,
};
pub use execute::{Removal, execute_plan, remove_files};
pub use plan::{build_copy_plan, ensure_paths_within, ensure_within_project, resolve_path};
pub use resolve::{component_sources, resolve_entry};

/// Default templates directory, relative to the project root.
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

/// Default static assets directory, relative to the project root.
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Default documentation directory, relative to the project root.
pub const DEFAULT_DOCS_DIR: &str = "docs";

/// One file to copy: an existing library source and its project destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPlan {
    /// Absolute path inside the component library.
    pub source: PathBuf,
    /// Absolute path inside the target project.
    pub destination: PathBuf,
}

/// Where a component's files land inside a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    /// Project root; every destination must stay beneath it.
    pub root: PathBuf,
    /// Templates directory, relative to `root`.
    pub templates_dir: PathBuf,
    /// Static assets directory, relative to `root`.
    pub static_dir: PathBuf,
    /// Whether `docs/` entries are part of the plan.
    pub include_docs: bool,
    /// Documentation directory relative to `root`; when absent, doc entries
    /// keep their manifest path verbatim.
    pub docs_dir: Option<PathBuf>,
}

impl ProjectLayout {
    /// Layout with the default `templates/` and `static/` directories and
    /// documentation excluded.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            templates_dir: PathBuf::from(DEFAULT_TEMPLATES_DIR),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            include_docs: false,
            docs_dir: None,
        }
    }

    /// Override the templates directory.
    #[must_use]
    pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = dir.into();
        self
    }

    /// Override the static assets directory.
    #[must_use]
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    /// Include documentation, optionally relocated under `docs_dir`.
    #[must_use]
    pub fn with_docs(mut self, include: bool, docs_dir: Option<PathBuf>) -> Self {
        self.include_docs = include;
        self.docs_dir = docs_dir;
        self
    }

    /// Absolute templates directory.
    #[must_use]
    pub fn templates_path(&self) -> PathBuf {
        self.root.join(&self.templates_dir)
    }

    /// Absolute static assets directory.
    #[must_use]
    pub fn static_path(&self) -> PathBuf {
        self.root.join(&self.static_dir)
    }

    /// Absolute documentation directory, when docs are included.
    #[must_use]
    pub fn docs_path(&self) -> Option<PathBuf> {
        if !self.include_docs {
            return None;
        }
        Some(
            self.docs_dir
                .as_deref()
                .map_or_else(|| self.root.join(DEFAULT_DOCS_DIR), |dir| self.root.join(dir)),
        )
    }
}
