//! Starter project composition.
//!
//! `greeble new` combines the starter component set with a handful of
//! project files embedded in the binary. All plans are built, sandboxed and
//! checked for collisions before the first write.
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ScaffoldError;
use crate::manifest::Manifest;
use crate::scaffold::fs::{copy_file, is_occupied, write_file};
use crate::scaffold::{
    CopyPlan, ProjectLayout, build_copy_plan, ensure_paths_within, ensure_within_project,
    execute_plan,
};

/// Components copied into every starter project, in copy order.
pub const STARTER_COMPONENTS: [&str; 11] = [
    "button",
    "dropdown",
    "modal",
    "tabs",
    "drawer",
    "table",
    "palette",
    "form-validated",
    "stepper",
    "infinite-list",
    "toast",
];

/// Directory under the manifest root holding branding icons.
pub const ICONS_SOURCE_DIR: &str = "public/images";

/// Directory under the project root receiving branding icons.
pub const ICONS_DEST_DIR: &str = "static/images";

/// Branding icons copied when present.
pub const ICON_FILES: [&str; 3] = [
    "greeble-icon-black.svg",
    "greeble-icon-alpha-white.png",
    "greeble-icon-alpha-black.png",
];

/// A project file embedded in the binary.
#[derive(Debug, Clone, Copy)]
pub struct ProjectFile {
    /// Destination relative to the project root, `/`-separated.
    pub path: &'static str,
    /// File contents.
    pub contents: &'static [u8],
}

/// Hand-authored project files, written after the components.
pub const PROJECT_FILES: [ProjectFile; 10] = [
    ProjectFile {
        path: "README.md",
        contents: include_bytes!("templates/README.md"),
    },
    ProjectFile {
        path: "pyproject.toml",
        contents: include_bytes!("templates/pyproject.toml"),
    },
    ProjectFile {
        path: "src/greeble_starter/app.py",
        contents: include_bytes!("templates/app.py"),
    },
    ProjectFile {
        path: "src/greeble_starter/__init__.py",
        contents: include_bytes!("templates/__init__.py"),
    },
    ProjectFile {
        path: "src/greeble_starter/__main__.py",
        contents: include_bytes!("templates/__main__.py"),
    },
    ProjectFile {
        path: "static/site.css",
        contents: include_bytes!("templates/site.css"),
    },
    ProjectFile {
        path: "static/logo.svg",
        contents: include_bytes!("templates/logo.svg"),
    },
    ProjectFile {
        path: "static/greeble/greeble-landing.css",
        contents: include_bytes!("templates/greeble-landing.css"),
    },
    ProjectFile {
        path: "static/greeble/hyperscript/greeble.hyperscript",
        contents: include_bytes!("templates/greeble.hyperscript"),
    },
    ProjectFile {
        path: "templates/index.html",
        contents: include_bytes!("templates/index.html"),
    },
];

/// Inputs for [`scaffold_starter`].
#[derive(Debug, Clone)]
pub struct StarterOptions {
    /// Absolute project root.
    pub project_root: PathBuf,
    /// Copy component documentation too.
    pub include_docs: bool,
    /// Documentation directory relative to the project root.
    pub docs_dir: Option<PathBuf>,
    /// Overwrite existing files.
    pub force: bool,
    /// Compute the report without writing anything.
    pub dry_run: bool,
}

/// Files produced (or, in a dry run, planned) by [`scaffold_starter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StarterReport {
    /// Component destinations, deduplicated and sorted.
    pub component_files: Vec<PathBuf>,
    /// Embedded project file destinations, sorted.
    pub project_files: Vec<PathBuf>,
}

impl StarterReport {
    /// Every destination, deduplicated and sorted.
    #[must_use]
    pub fn all_files(&self) -> Vec<PathBuf> {
        self.component_files
            .iter()
            .chain(&self.project_files)
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Check that `root` can receive a starter project.
///
/// A missing root is fine. An existing root must be a directory, and it
/// must be empty unless `force` is set.
///
/// # Errors
///
/// Returns [`ScaffoldError::NotADirectory`],
/// [`ScaffoldError::DestinationNotEmpty`] or [`ScaffoldError::Io`].
pub fn ensure_destination_ready(root: &Path, force: bool) -> Result<(), ScaffoldError> {
    if !root.exists() {
        return Ok(());
    }
    if !root.is_dir() {
        return Err(ScaffoldError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    let non_empty = fs::read_dir(root)
        .map_err(ScaffoldError::io("read directory", root))?
        .next()
        .is_some();
    if non_empty && !force {
        return Err(ScaffoldError::DestinationNotEmpty {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}

/// Compose a starter project under `options.project_root`.
///
/// # Errors
///
/// Returns a [`ScaffoldError`] when a starter component is missing from the
/// manifest, a source is missing, a destination escapes the project, two
/// sources claim one destination, a destination exists without `force`, or
/// a write fails. Nothing is written when any check before the first write
/// fails.
pub fn scaffold_starter(
    manifest: &Manifest,
    options: &StarterOptions,
) -> Result<StarterReport, ScaffoldError> {
    let root = &options.project_root;
    let layout =
        ProjectLayout::new(root).with_docs(options.include_docs, options.docs_dir.clone());

    let mut batch = Vec::new();
    for key in STARTER_COMPONENTS {
        let component = manifest.get(key)?;
        let plans = build_copy_plan(manifest, component, &layout)?;
        ensure_within_project(root, &plans)?;
        batch.extend(plans);
    }
    let plans = dedupe_destinations(batch)?;

    let project_files: Vec<(PathBuf, &'static [u8])> = PROJECT_FILES
        .iter()
        .map(|file| (root.join(file.path), file.contents))
        .collect();
    ensure_paths_within(root, project_files.iter().map(|(path, _)| path.as_path()))?;
    reject_project_file_conflicts(&plans, PROJECT_FILES.iter().map(|file| file.path), root)?;

    if !options.force && !options.dry_run {
        let existing = plans
            .iter()
            .map(|plan| &plan.destination)
            .chain(project_files.iter().map(|(path, _)| path))
            .find(|path| is_occupied(path));
        if let Some(path) = existing {
            return Err(ScaffoldError::AlreadyExists { path: path.clone() });
        }
    }

    let component_files = execute_plan(&plans, options.force, options.dry_run)?;

    if !options.dry_run {
        for (path, contents) in &project_files {
            write_file(path, contents)?;
            tracing::debug!("wrote {}", path.display());
        }
        if let Err(err) = copy_icons(&manifest.root, root) {
            tracing::warn!("Skipping branding icons: {err}");
        }
    }

    Ok(StarterReport {
        component_files: sorted(component_files),
        project_files: sorted(project_files.into_iter().map(|(path, _)| path).collect()),
    })
}

/// Drop repeated `(source, destination)` pairs and reject destinations
/// claimed by two different sources.
fn dedupe_destinations(plans: Vec<CopyPlan>) -> Result<Vec<CopyPlan>, ScaffoldError> {
    let mut claimed: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();
    let mut unique = Vec::with_capacity(plans.len());
    for plan in plans {
        match claimed.get(&plan.destination) {
            Some(first) if *first == plan.source => {}
            Some(first) => {
                return Err(ScaffoldError::ConflictingDestination {
                    path: plan.destination,
                    first: first.clone(),
                    second: plan.source,
                });
            }
            None => {
                claimed.insert(plan.destination.clone(), plan.source.clone());
                unique.push(plan);
            }
        }
    }
    Ok(unique)
}

/// Reject component plans that target one of the embedded project files.
fn reject_project_file_conflicts<'a>(
    plans: &[CopyPlan],
    project_files: impl IntoIterator<Item = &'a str>,
    root: &Path,
) -> Result<(), ScaffoldError> {
    for file in project_files {
        let destination = root.join(file);
        if let Some(plan) = plans.iter().find(|plan| plan.destination == destination) {
            return Err(ScaffoldError::ConflictingDestination {
                path: destination,
                first: plan.source.clone(),
                second: PathBuf::from(file),
            });
        }
    }
    Ok(())
}

/// Copy the branding icons that exist under the library into the project.
///
/// Returns the icons that were copied.
///
/// # Errors
///
/// Returns [`ScaffoldError::Io`] if an icon cannot be copied.
pub fn copy_icons(library_root: &Path, project_root: &Path) -> Result<Vec<PathBuf>, ScaffoldError> {
    let source_dir = library_root.join(ICONS_SOURCE_DIR);
    let dest_dir = project_root.join(ICONS_DEST_DIR);
    let mut copied = Vec::new();
    for name in ICON_FILES {
        let source = source_dir.join(name);
        if !source.is_file() {
            continue;
        }
        let destination = dest_dir.join(name);
        copy_file(&source, &destination)?;
        copied.push(destination);
    }
    Ok(copied)
}

fn sorted(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths.sort();
    paths.dedup();
    paths
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::manifest::load_manifest;
    use crate::scaffold::resolve::COMPONENTS_DIR;

    /// Library with every starter component (one template and one
    /// stylesheet each) plus a project directory.
    fn library() -> (tempfile::TempDir, Manifest, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = dunce::canonicalize(dir.path()).unwrap();
        let mut yaml = String::from("version: 1\ncomponents:\n");
        for key in STARTER_COMPONENTS {
            let base = root.join(COMPONENTS_DIR).join(key);
            fs::create_dir_all(base.join("templates")).unwrap();
            fs::create_dir_all(base.join("static")).unwrap();
            fs::write(base.join(format!("templates/{key}.html")), key).unwrap();
            fs::write(base.join(format!("static/{key}.css")), key).unwrap();
            yaml.push_str(&format!(
                "  - key: {key}\n    files: [templates/greeble/{key}.html, static/greeble/{key}.css]\n"
            ));
        }
        fs::write(root.join("greeble.manifest.yaml"), yaml).unwrap();
        let manifest = load_manifest(&root.join("greeble.manifest.yaml")).unwrap();
        let project = root.join("app");
        (dir, manifest, project)
    }

    fn options(project: &Path) -> StarterOptions {
        StarterOptions {
            project_root: project.to_path_buf(),
            include_docs: false,
            docs_dir: None,
            force: false,
            dry_run: false,
        }
    }

    #[test]
    fn writes_components_and_project_files() {
        let (_dir, manifest, project) = library();
        let report = scaffold_starter(&manifest, &options(&project)).unwrap();

        assert_eq!(report.component_files.len(), STARTER_COMPONENTS.len() * 2);
        assert_eq!(report.project_files.len(), PROJECT_FILES.len());
        assert!(project.join("templates/greeble/modal.html").is_file());
        assert!(project.join("templates/index.html").is_file());
        assert!(project.join("src/greeble_starter/app.py").is_file());
        assert!(report.component_files.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let (_dir, manifest, project) = library();
        let mut opts = options(&project);
        opts.dry_run = true;
        let report = scaffold_starter(&manifest, &opts).unwrap();

        assert_eq!(report.all_files().len(), STARTER_COMPONENTS.len() * 2 + PROJECT_FILES.len());
        assert!(!project.exists());
    }

    #[test]
    fn existing_file_without_force_writes_nothing() {
        let (_dir, manifest, project) = library();
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("README.md"), "mine").unwrap();

        let err = scaffold_starter(&manifest, &options(&project)).unwrap_err();
        assert!(matches!(err, ScaffoldError::AlreadyExists { .. }));
        assert!(!project.join("templates").exists());
        assert_eq!(fs::read_to_string(project.join("README.md")).unwrap(), "mine");
    }

    #[test]
    fn force_overwrites_project_files() {
        let (_dir, manifest, project) = library();
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("README.md"), "mine").unwrap();

        let mut opts = options(&project);
        opts.force = true;
        scaffold_starter(&manifest, &opts).unwrap();
        assert_eq!(
            fs::read(project.join("README.md")).unwrap(),
            PROJECT_FILES[0].contents
        );
    }

    #[test]
    fn missing_starter_component_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("m.yaml"), "version: 1\ncomponents: []\n").unwrap();
        let manifest = load_manifest(&dir.path().join("m.yaml")).unwrap();
        let err = scaffold_starter(&manifest, &options(&dir.path().join("app"))).unwrap_err();
        assert!(matches!(err, ScaffoldError::UnknownComponent { .. }));
    }

    #[test]
    fn icons_are_copied_when_present() {
        let (_dir, manifest, project) = library();
        let icons = manifest.root.join(ICONS_SOURCE_DIR);
        fs::create_dir_all(&icons).unwrap();
        fs::write(icons.join("greeble-icon-black.svg"), "<svg/>").unwrap();

        scaffold_starter(&manifest, &options(&project)).unwrap();
        assert!(project.join("static/images/greeble-icon-black.svg").is_file());
        assert!(!project.join("static/images/greeble-icon-alpha-white.png").exists());
    }

    #[test]
    fn conflicting_sources_are_rejected() {
        let plans = vec![
            CopyPlan {
                source: PathBuf::from("/lib/a/x.css"),
                destination: PathBuf::from("/p/static/x.css"),
            },
            CopyPlan {
                source: PathBuf::from("/lib/b/x.css"),
                destination: PathBuf::from("/p/static/x.css"),
            },
        ];
        let err = dedupe_destinations(plans).unwrap_err();
        assert!(matches!(err, ScaffoldError::ConflictingDestination { .. }));
    }

    #[test]
    fn component_claiming_a_project_file_is_rejected() {
        let (_dir, manifest, project) = library();
        let button = manifest.root.join(COMPONENTS_DIR).join("button");
        fs::write(button.join("static/site.css"), "body{}").unwrap();
        let yaml = fs::read_to_string(&manifest.path).unwrap().replace(
            "static/greeble/button.css]",
            "static/greeble/button.css, static/site.css]",
        );
        fs::write(&manifest.path, yaml).unwrap();
        let manifest = load_manifest(&manifest.path).unwrap();

        let err = scaffold_starter(&manifest, &options(&project)).unwrap_err();
        let (path, second) = match err {
            ScaffoldError::ConflictingDestination { path, second, .. } => (path, second),
            other => panic!("expected a conflict, got {other}"),
        };
        assert_eq!(path, project.join("static/site.css"));
        assert_eq!(second, PathBuf::from("static/site.css"));
        assert!(!project.exists());
    }

    #[test]
    fn repeated_pairs_are_deduplicated() {
        let plan = CopyPlan {
            source: PathBuf::from("/lib/a/x.css"),
            destination: PathBuf::from("/p/static/x.css"),
        };
        let unique = dedupe_destinations(vec![plan.clone(), plan]).unwrap();
        assert_eq!(unique.len(), 1);
    }

    #[test]
    fn destination_ready_rules() {
        let dir = tempfile::tempdir().unwrap();
        ensure_destination_ready(&dir.path().join("absent"), false).unwrap();
        ensure_destination_ready(dir.path(), false).unwrap();

        fs::write(dir.path().join("file"), "x").unwrap();
        let err = ensure_destination_ready(dir.path(), false).unwrap_err();
        assert!(matches!(err, ScaffoldError::DestinationNotEmpty { .. }));
        ensure_destination_ready(dir.path(), true).unwrap();

        let err = ensure_destination_ready(&dir.path().join("file"), true).unwrap_err();
        assert!(matches!(err, ScaffoldError::NotADirectory { .. }));
    }
}
