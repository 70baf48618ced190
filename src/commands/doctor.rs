//! Command: validate the manifest, its sources, and optionally a project.
use anyhow::{Context as _, Result, bail};

use crate::cli::{DoctorOpts, GlobalOpts};
use crate::doctor::{DoctorReport, Level, build_report};
use crate::error::GreebleError;
use crate::logging::Logger;
use crate::scaffold::ProjectLayout;

/// Run the doctor command.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or any declared
/// component source is missing.
pub fn run(global: &GlobalOpts, opts: &DoctorOpts, log: &Logger) -> Result<()> {
    let manifest = super::load(global, log)?;

    let layout = opts
        .project
        .as_deref()
        .map(super::absolute_root)
        .transpose()?
        .map(|root| {
            ProjectLayout::new(root)
                .with_templates_dir(&opts.templates)
                .with_static_dir(&opts.static_dir)
                .with_docs(opts.include_docs, Some(opts.docs.clone()))
        });

    let report = build_report(&manifest, layout.as_ref()).map_err(GreebleError::from)?;

    if opts.json {
        let json = serde_json::to_string_pretty(&report).context("serializing doctor report")?;
        #[allow(clippy::print_stdout)]
        {
            println!("{json}");
        }
    } else {
        render(&report, log);
    }

    if !report.is_ok() {
        bail!("{} component(s) have missing sources", report.summary.errors);
    }
    Ok(())
}

fn render(report: &DoctorReport, log: &Logger) {
    log.stage("Manifest");
    log.info(&format!("Manifest path: {}", report.manifest.path.display()));
    log.info(&format!("Schema version: {}", report.manifest.version));

    match (&report.tokens.path, report.tokens.status) {
        (Some(path), Level::Ok) => log.info(&format!("Tokens file: {}", path.display())),
        (Some(path), _) => log.warn(&format!("Tokens file not found: {}", path.display())),
        (None, _) => log.info("Tokens file: not declared in manifest"),
    }

    log.stage("Components");
    log.info(&format!(
        "Checked {} component(s), {} source(s)",
        report.summary.components_checked, report.summary.sources_checked
    ));
    for missing in &report.components.missing_sources {
        for source in &missing.sources {
            log.error(&format!(
                "Missing source for {}: {}",
                missing.component,
                source.display()
            ));
        }
    }

    if let Some(project) = &report.project {
        log.stage("Project");
        if project.exists {
            log.info(&format!("Project root: {}", project.root.display()));
        } else {
            log.warn(&format!("Project root does not exist: {}", project.root.display()));
        }
        for path in &project.paths {
            let shown = path
                .relative
                .as_deref()
                .unwrap_or(&path.path)
                .display()
                .to_string();
            if path.exists {
                log.info(&format!("{} directory: {shown}", path.kind));
            } else {
                log.warn(&format!("{} directory missing: {shown}", path.kind));
            }
        }
    }

    if report.is_ok() {
        log.info("Doctor checks passed.");
    }
}
