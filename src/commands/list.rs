//! Command: list the components declared in the manifest.
use anyhow::{Context as _, Result};
use serde::Serialize;

use crate::cli::{GlobalOpts, ListOpts};
use crate::logging::Logger;
use crate::manifest::Manifest;

/// JSON payload printed by `list --json`.
#[derive(Debug, Serialize)]
pub struct ListPayload<'a> {
    /// Number of components.
    pub total: usize,
    /// Components in key order.
    pub components: Vec<ComponentEntry<'a>>,
}

/// One component in [`ListPayload`].
#[derive(Debug, Serialize)]
pub struct ComponentEntry<'a> {
    /// Component key.
    pub key: &'a str,
    /// Display title.
    pub title: &'a str,
    /// One-line description.
    pub summary: &'a str,
    /// Declared files.
    pub files: &'a [String],
}

/// Build the `list --json` payload.
#[must_use]
pub fn payload(manifest: &Manifest) -> ListPayload<'_> {
    let components: Vec<ComponentEntry<'_>> = manifest
        .components
        .values()
        .map(|c| ComponentEntry {
            key: &c.key,
            title: &c.title,
            summary: &c.summary,
            files: &c.files,
        })
        .collect();
    ListPayload {
        total: components.len(),
        components,
    }
}

/// Run the list command.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or the JSON payload
/// cannot be serialized.
pub fn run(global: &GlobalOpts, opts: &ListOpts, log: &Logger) -> Result<()> {
    let manifest = super::load(global, log)?;

    if opts.json {
        let json = serde_json::to_string_pretty(&payload(&manifest))
            .context("serializing component list")?;
        #[allow(clippy::print_stdout)]
        {
            println!("{json}");
        }
        return Ok(());
    }

    log.info("Available components:");
    log.info("");
    for component in manifest.components.values() {
        log.info(&format!(
            "- {}: {} - {}",
            component.key, component.title, component.summary
        ));
    }
    Ok(())
}
