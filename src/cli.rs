//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::scaffold::{DEFAULT_DOCS_DIR, DEFAULT_STATIC_DIR, DEFAULT_TEMPLATES_DIR, ProjectLayout};

/// Top-level CLI entry point for the Greeble component scaffolder.
#[derive(Parser, Debug)]
#[command(
    name = "greeble",
    about = "Copy Greeble HTMX components into your project",
    version = crate::VERSION
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Path to greeble.manifest.yaml (defaults to the library root)
    #[arg(long, global = true, value_name = "PATH")]
    pub manifest: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available components
    List(ListOpts),
    /// Copy a component into your project
    Add(AddOpts),
    /// Re-copy a component, overwriting existing files
    Sync(SyncOpts),
    /// Remove a component's files from your project
    Remove(RemoveOpts),
    /// Scaffold a new Greeble starter project
    New(NewOpts),
    /// Validate manifest and project setup
    Doctor(DoctorOpts),
}

impl Command {
    /// Short name used for the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Add(_) => "add",
            Self::Sync(_) => "sync",
            Self::Remove(_) => "remove",
            Self::New(_) => "new",
            Self::Doctor(_) => "doctor",
        }
    }
}

/// Options for the `list` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ListOpts {
    /// Output JSON payload of components
    #[arg(long)]
    pub json: bool,
}

/// Where component files go inside the project.
#[derive(Args, Debug, Clone)]
pub struct LayoutOpts {
    /// Destination project root (default: current directory)
    #[arg(long, default_value = ".")]
    pub project: PathBuf,

    /// Templates root relative to project
    #[arg(long, default_value = DEFAULT_TEMPLATES_DIR)]
    pub templates: PathBuf,

    /// Static assets root relative to project
    #[arg(long = "static", default_value = DEFAULT_STATIC_DIR)]
    pub static_dir: PathBuf,

    /// Docs root relative to project
    #[arg(long, default_value = DEFAULT_DOCS_DIR)]
    pub docs: PathBuf,

    /// Include documentation files
    #[arg(long)]
    pub include_docs: bool,
}

impl LayoutOpts {
    /// Build a layout rooted at `root` (usually the absolute form of
    /// [`Self::project`]).
    #[must_use]
    pub fn layout(&self, root: PathBuf) -> ProjectLayout {
        ProjectLayout::new(root)
            .with_templates_dir(&self.templates)
            .with_static_dir(&self.static_dir)
            .with_docs(self.include_docs, Some(self.docs.clone()))
    }
}

/// Options for the `add` subcommand.
#[derive(Args, Debug, Clone)]
pub struct AddOpts {
    /// Component key to add (see `greeble list`)
    pub component: String,

    /// Project layout.
    #[command(flatten)]
    pub layout: LayoutOpts,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,

    /// Show the files that would be copied without writing them
    #[arg(long)]
    pub dry_run: bool,
}

/// Options for the `sync` subcommand.
#[derive(Args, Debug, Clone)]
pub struct SyncOpts {
    /// Component key to sync
    pub component: String,

    /// Project layout.
    #[command(flatten)]
    pub layout: LayoutOpts,

    /// Create backups of existing files before overwriting
    #[arg(long)]
    pub backup: bool,

    /// Preview without writing
    #[arg(long)]
    pub dry_run: bool,
}

/// Options for the `remove` subcommand.
#[derive(Args, Debug, Clone)]
pub struct RemoveOpts {
    /// Component key to remove
    pub component: String,

    /// Project layout.
    #[command(flatten)]
    pub layout: LayoutOpts,

    /// Preview without deleting files
    #[arg(long)]
    pub dry_run: bool,
}

/// Options for the `new` subcommand.
#[derive(Args, Debug, Clone)]
pub struct NewOpts {
    /// Destination directory for the starter project
    pub project: PathBuf,

    /// Copy component documentation alongside templates/static
    #[arg(long)]
    pub include_docs: bool,

    /// Docs root relative to project
    #[arg(long, default_value = DEFAULT_DOCS_DIR)]
    pub docs: PathBuf,

    /// Overwrite existing files in the destination
    #[arg(long)]
    pub force: bool,

    /// Show the files that would be created
    #[arg(long)]
    pub dry_run: bool,
}

/// Options for the `doctor` subcommand.
#[derive(Args, Debug, Clone)]
pub struct DoctorOpts {
    /// Optional project root to inspect
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// Templates root relative to project
    #[arg(long, default_value = DEFAULT_TEMPLATES_DIR)]
    pub templates: PathBuf,

    /// Static root relative to project
    #[arg(long = "static", default_value = DEFAULT_STATIC_DIR)]
    pub static_dir: PathBuf,

    /// Docs root relative to project
    #[arg(long, default_value = DEFAULT_DOCS_DIR)]
    pub docs: PathBuf,

    /// Report on the docs directory when a project root is supplied
    #[arg(long)]
    pub include_docs: bool,

    /// Emit a structured JSON report to stdout
    #[arg(long)]
    pub json: bool,
}
