//! Greeble component scaffolding engine.
//!
//! Copies the files of Greeble HTMX components, as declared in
//! `greeble.manifest.yaml`, into a consuming project, and composes a
//! runnable starter project from a fixed set of components.
//!
//! The public API is organised into layers:
//!
//! - **[`manifest`]**: load and validate the component manifest
//! - **[`scaffold`]**: resolve file entries, plan copies, sandbox checks, copy/remove/backup
//! - **[`starter`]**: compose the starter project
//! - **[`doctor`]**: read-only health report over a manifest and project
//! - **[`commands`]**: top-level subcommand orchestration (`list`, `add`, `sync`, ...)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod doctor;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod scaffold;
pub mod starter;

/// Version string, overridable at build time through `GREEBLE_VERSION`.
pub const VERSION: &str = match option_env!("GREEBLE_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};
