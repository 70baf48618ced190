// Shared helpers for integration tests.
//
// Provides a temporary component library (manifest plus component sources)
// next to an empty project directory, and a fluent builder so each test can
// declare only the components it needs.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use greeble_cli::cli::{GlobalOpts, LayoutOpts};
use greeble_cli::logging::Logger;
use greeble_cli::manifest::MANIFEST_FILE_NAME;
use greeble_cli::scaffold::resolve::COMPONENTS_DIR;
use greeble_cli::starter::STARTER_COMPONENTS;
use sha2::{Digest as _, Sha256};

/// A component library and a project directory backed by a
/// [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    /// Temporary directory holding `lib/` and `app/`.
    pub dir: tempfile::TempDir,
    /// Library root (directory containing the manifest).
    pub library: PathBuf,
    /// Project root.
    pub project: PathBuf,
}

impl IntegrationTestContext {
    /// Options pointing every command at this library's manifest.
    pub fn global(&self) -> GlobalOpts {
        GlobalOpts {
            manifest: Some(self.library.join(MANIFEST_FILE_NAME)),
        }
    }

    /// Default layout options rooted at the project.
    pub fn layout(&self) -> LayoutOpts {
        LayoutOpts {
            project: self.project.clone(),
            templates: PathBuf::from("templates"),
            static_dir: PathBuf::from("static"),
            docs: PathBuf::from("docs"),
            include_docs: false,
        }
    }

    /// Path inside the project.
    pub fn project_file(&self, relative: &str) -> PathBuf {
        self.project.join(relative)
    }

    /// Read a project file as text.
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.project_file(relative)).expect("read project file")
    }

    /// Path of a component source inside the library.
    pub fn source(&self, key: &str, relative: &str) -> PathBuf {
        self.library.join(COMPONENTS_DIR).join(key).join(relative)
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    components: BTreeMap<String, Vec<(String, String)>>,
    tokens: Option<(String, bool)>,
    create_project: bool,
}

impl TestContextBuilder {
    /// Begin building an empty library with an existing project directory.
    pub fn new() -> Self {
        Self {
            components: BTreeMap::new(),
            tokens: None,
            create_project: true,
        }
    }

    /// Declare `key` with `(entry, contents)` files. Template and static
    /// sources are written under the component's package directory, docs
    /// under the library root.
    pub fn with_component(mut self, key: &str, files: &[(&str, &str)]) -> Self {
        self.components.insert(
            key.to_string(),
            files
                .iter()
                .map(|(entry, contents)| ((*entry).to_string(), (*contents).to_string()))
                .collect(),
        );
        self
    }

    /// Declare every starter component with one template and one stylesheet.
    pub fn with_starter_components(mut self) -> Self {
        for key in STARTER_COMPONENTS {
            let template = format!("templates/greeble/{key}.html");
            let stylesheet = format!("static/greeble/{key}.css");
            self = self.with_component(
                key,
                &[(template.as_str(), key), (stylesheet.as_str(), key)],
            );
        }
        self
    }

    /// Declare `library.tokens_file`, optionally creating it.
    pub fn with_tokens(mut self, relative: &str, create: bool) -> Self {
        self.tokens = Some((relative.to_string(), create));
        self
    }

    /// Do not create the project directory.
    pub fn without_project(mut self) -> Self {
        self.create_project = false;
        self
    }

    /// Write the library and return the context.
    pub fn build(self) -> IntegrationTestContext {
        let dir = tempfile::tempdir().expect("create temp dir");
        let base = dunce::canonicalize(dir.path()).expect("canonicalize temp dir");
        let library = base.join("lib");
        let project = base.join("app");
        std::fs::create_dir_all(&library).expect("create library dir");
        if self.create_project {
            std::fs::create_dir_all(&project).expect("create project dir");
        }

        let mut yaml = String::from("version: 1\ncomponents:\n");
        if self.components.is_empty() {
            yaml = String::from("version: 1\ncomponents: []\n");
        }
        for (key, files) in &self.components {
            yaml.push_str(&format!("  - key: {key}\n    files:\n"));
            for (entry, contents) in files {
                yaml.push_str(&format!("      - {entry}\n"));
                let source = if entry.starts_with("docs/") {
                    library.join(entry)
                } else {
                    library.join(COMPONENTS_DIR).join(key).join(entry)
                };
                std::fs::create_dir_all(source.parent().expect("source parent"))
                    .expect("create source dir");
                std::fs::write(&source, contents).expect("write source");
            }
        }
        if let Some((tokens, create)) = &self.tokens {
            yaml.push_str(&format!("library:\n  tokens_file: {tokens}\n"));
            if *create {
                std::fs::write(library.join(tokens), ":root {}\n").expect("write tokens");
            }
        }
        std::fs::write(library.join(MANIFEST_FILE_NAME), yaml).expect("write manifest");

        IntegrationTestContext {
            dir,
            library,
            project,
        }
    }
}

/// Logger for calling command handlers directly.
pub fn logger() -> Logger {
    Logger::new("integration-test")
}

/// SHA-256 of every file under `root`, keyed by relative path.
pub fn tree_hashes(root: &Path) -> BTreeMap<PathBuf, String> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, String>) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        for entry in entries {
            let path = entry.expect("read dir entry").path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let bytes = std::fs::read(&path).expect("read file");
                let digest = Sha256::digest(&bytes);
                let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
                out.insert(
                    path.strip_prefix(root).expect("under root").to_path_buf(),
                    hex,
                );
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}
