//! Domain-specific error types for the scaffolding engine.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Engine modules return typed errors ([`ManifestError`], [`ScaffoldError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! GreebleError
//! ├── Manifest(ManifestError): manifest missing, malformed, or violating the schema
//! └── Scaffold(ScaffoldError): path resolution, sandbox checks, filesystem execution
//! ```

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Exit code used for manifest and scaffold failures.
pub const VALIDATION_EXIT_CODE: u8 = 2;

/// Top-level error type for the scaffolding engine.
///
/// Callers branch on the kind only; both variants carry a human-readable
/// message and map to the same exit code.
#[derive(Error, Debug)]
pub enum GreebleError {
    /// The manifest could not be loaded.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// A scaffold operation failed.
    #[error(transparent)]
    Scaffold(#[from] ScaffoldError),
}

impl GreebleError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Manifest(_) | Self::Scaffold(_) => VALIDATION_EXIT_CODE,
        }
    }
}

/// Errors that arise while loading and validating a component manifest.
///
/// Always detected before any per-component operation begins.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest file does not exist.
    #[error("Manifest file not found: {}", .path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The manifest file exists but could not be read.
    #[error("Failed to read manifest {}: {source}", .path.display())]
    Read {
        /// Path to the manifest.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The manifest is not valid YAML or does not match the schema structure.
    #[error("Invalid manifest {}: {message}", .path.display())]
    Parse {
        /// Path to the manifest.
        path: PathBuf,
        /// Parser message, including the offending location when known.
        message: String,
    },

    /// The manifest parsed but broke one or more schema rules.
    #[error("Invalid manifest {}: {}", .path.display(), .violations.join("; "))]
    Invalid {
        /// Path to the manifest.
        path: PathBuf,
        /// Every rule violation found, in document order.
        violations: Vec<String>,
    },
}

/// Errors that arise during path resolution, sandbox validation, or
/// filesystem execution.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// The requested component key is not declared in the manifest.
    #[error("Unknown component '{key}'. Available: {available}")]
    UnknownComponent {
        /// Key that was requested.
        key: String,
        /// Comma-separated list of declared keys.
        available: String,
    },

    /// A file entry does not start with a supported namespace.
    #[error(
        "Unsupported file path '{entry}' in component '{component}'. Expected path to start with one of: docs, static, templates."
    )]
    UnsupportedPath {
        /// The offending manifest entry.
        entry: String,
        /// Component declaring the entry.
        component: String,
    },

    /// A resolved source file does not exist in the component library.
    #[error("Source file missing: {}", .path.display())]
    SourceMissing {
        /// Resolved source path.
        path: PathBuf,
    },

    /// A destination resolves outside the project root.
    #[error("Refusing to write outside project root: {}", .path.display())]
    OutsideProject {
        /// Resolved destination path.
        path: PathBuf,
    },

    /// A destination exists and overwriting was not requested.
    #[error("File already exists: {}", .path.display())]
    AlreadyExists {
        /// Existing destination path.
        path: PathBuf,
    },

    /// The project root must exist for this operation.
    #[error("Project root does not exist: {}", .path.display())]
    ProjectRootMissing {
        /// Project root that was supplied.
        path: PathBuf,
    },

    /// The destination exists and is not a directory.
    #[error("Destination exists and is not a directory: {}", .path.display())]
    NotADirectory {
        /// Destination path.
        path: PathBuf,
    },

    /// The destination directory already has content and `--force` was not given.
    #[error(
        "Destination is not empty: {}; re-run with --force to overwrite",
        .path.display()
    )]
    DestinationNotEmpty {
        /// Destination path.
        path: PathBuf,
    },

    /// Two different sources in one batch target the same destination.
    #[error(
        "Conflicting destination {}: claimed by both {} and {}",
        .path.display(),
        .first.display(),
        .second.display()
    )]
    ConflictingDestination {
        /// Destination claimed twice.
        path: PathBuf,
        /// Source that claimed it first.
        first: PathBuf,
        /// Source that claimed it second.
        second: PathBuf,
    },

    /// An OS-level filesystem call failed.
    #[error("Failed to {action} {}: {source}", .path.display())]
    Io {
        /// Short verb phrase describing the attempted action.
        action: &'static str,
        /// Path the action was applied to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl ScaffoldError {
    /// Build a `map_err` adapter that wraps an [`io::Error`] for `path`.
    pub fn io(action: &'static str, path: &Path) -> impl FnOnce(io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| Self::Io {
            action,
            path,
            source,
        }
    }
}
