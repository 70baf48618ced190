//! Component manifest loading.
//!
//! The manifest is a YAML document listing every component the library
//! ships and the files each one contributes:
//!
//! ```yaml
//! version: 1
//! components:
//!   - key: button
//!     title: Button
//!     files: [templates/greeble/button.html, static/greeble/button.css]
//! library:
//!   tokens_file: packages/greeble_core/assets/css/greeble-core.css
//! ```
//!
//! Loading happens in two passes. Serde checks structure and types and stops
//! at the first defect; [`validation`] then checks the semantic rules and
//! reports every violation at once. A [`Manifest`] is only returned when both
//! passes succeed.
pub mod validation;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ManifestError, ScaffoldError};

/// File name of the manifest at the library root.
pub const MANIFEST_FILE_NAME: &str = "greeble.manifest.yaml";

/// Asset namespace selected by the first segment of a file entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// `templates/...`: HTML fragments.
    Templates,
    /// `static/...`: CSS, JS and images.
    Static,
    /// `docs/...`: component documentation.
    Docs,
}

impl Namespace {
    /// All namespaces, in the order they are listed in messages.
    pub const ALL: [Self; 3] = [Self::Docs, Self::Static, Self::Templates];

    /// Parse the leading segment of a file entry.
    #[must_use]
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "templates" => Some(Self::Templates),
            "static" => Some(Self::Static),
            "docs" => Some(Self::Docs),
            _ => None,
        }
    }

    /// Directory name of this namespace.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Templates => "templates",
            Self::Static => "static",
            Self::Docs => "docs",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, reusable bundle of template, static and doc files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Unique key used on the command line.
    pub key: String,
    /// Display title; defaults to the title-cased key.
    pub title: String,
    /// One-line description; defaults to empty.
    pub summary: String,
    /// Declared files, in manifest order.
    pub files: Vec<String>,
}

/// Library-wide metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    /// Python packages the library is distributed as.
    pub packages: Option<Vec<String>>,
    /// Design-token stylesheet, relative to the manifest root.
    pub tokens_file: Option<String>,
}

/// A validated component manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Schema version (always positive).
    pub version: u64,
    /// Components by key.
    pub components: BTreeMap<String, Component>,
    /// Library metadata.
    pub library: Library,
    /// Directory containing the manifest; anchors all relative resolution.
    pub root: PathBuf,
    /// Canonical path of the manifest file itself.
    pub path: PathBuf,
}

impl Manifest {
    /// Look up a component by key.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::UnknownComponent`] listing the available keys
    /// if `key` is not declared.
    pub fn get(&self, key: &str) -> Result<&Component, ScaffoldError> {
        self.components
            .get(key)
            .ok_or_else(|| ScaffoldError::UnknownComponent {
                key: key.to_string(),
                available: self.keys().collect::<Vec<_>>().join(", "),
            })
    }

    /// Component keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    /// Absolute path of the declared tokens file, if any.
    #[must_use]
    pub fn tokens_file(&self) -> Option<PathBuf> {
        self.library
            .tokens_file
            .as_deref()
            .map(|rel| self.root.join(rel))
    }
}

/// Top-level manifest document as written on disk.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawManifest {
    pub(crate) version: i64,
    pub(crate) components: Vec<RawComponent>,
    #[serde(default)]
    pub(crate) library: Option<RawLibrary>,
}

/// One entry of the `components` list.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawComponent {
    pub(crate) key: String,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) summary: Option<String>,
    #[serde(default)]
    pub(crate) files: Vec<String>,
}

/// The optional `library` mapping.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawLibrary {
    #[serde(default)]
    pub(crate) packages: Option<Vec<String>>,
    #[serde(default)]
    pub(crate) tokens_file: Option<String>,
}

/// Load and validate the manifest at `path`.
///
/// # Errors
///
/// Returns a [`ManifestError`] if the file is missing or unreadable, is not
/// valid YAML, does not match the schema structure, or breaks any schema
/// rule. No partially-built manifest is ever returned.
pub fn load_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    if !path.exists() {
        return Err(ManifestError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let path = dunce::canonicalize(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let raw = parse(&content).map_err(|message| ManifestError::Parse {
        path: path.clone(),
        message,
    })?;

    let violations = validation::validate(&raw);
    if !violations.is_empty() {
        return Err(ManifestError::Invalid { path, violations });
    }

    let root = path
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    Ok(build(raw, root, path))
}

/// Deserialize manifest text, reporting structural defects as a message.
fn parse(content: &str) -> Result<RawManifest, String> {
    let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
    if !value.is_mapping() {
        return Err("Manifest root must be a mapping".to_string());
    }
    serde_yaml::from_value(value).map_err(|e| e.to_string())
}

/// Convert a validated raw document into the immutable model.
fn build(raw: RawManifest, root: PathBuf, path: PathBuf) -> Manifest {
    let components = raw
        .components
        .into_iter()
        .map(|c| {
            let title = c.title.unwrap_or_else(|| title_case(&c.key));
            let component = Component {
                title,
                summary: c.summary.unwrap_or_default(),
                files: c.files,
                key: c.key,
            };
            (component.key.clone(), component)
        })
        .collect();

    let library = raw
        .library
        .map(|lib| Library {
            packages: lib.packages,
            tokens_file: lib.tokens_file,
        })
        .unwrap_or_default();

    Manifest {
        version: raw.version.unsigned_abs(),
        components,
        library,
        root,
        path,
    }
}

/// Upper-case the first letter of every alphabetic run and lower-case the rest.
fn title_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut in_word = false;
    for c in key.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use std::path::PathBuf;

    /// Write `content` as a manifest file inside a fresh temporary directory.
    #[allow(clippy::expect_used)]
    pub(crate) fn write_manifest(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(super::MANIFEST_FILE_NAME);
        std::fs::write(&path, content).expect("write manifest");
        (dir, path)
    }
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::test_helpers::write_manifest;
    use super::*;

    const VALID: &str = r"
version: 1
components:
  - key: modal
    title: Modal dialog
    summary: Accessible modal
    files:
      - templates/greeble/modal.html
      - static/greeble/modal.css
      - docs/modal.md
  - key: button
    files: [templates/button.html, static/button.css]
  - key: form-validated
library:
  packages: [greeble_core]
  tokens_file: packages/greeble_core/assets/css/greeble-core.css
";

    fn expect_invalid(content: &str) -> ManifestError {
        let (_dir, path) = write_manifest(content);
        load_manifest(&path).unwrap_err()
    }

    #[test]
    fn loads_components_and_preserves_file_order() {
        let (_dir, path) = write_manifest(VALID);
        let manifest = load_manifest(&path).unwrap();

        assert_eq!(manifest.version, 1);
        assert_eq!(
            manifest.keys().collect::<Vec<_>>(),
            vec!["button", "form-validated", "modal"]
        );
        let modal = manifest.get("modal").unwrap();
        assert_eq!(
            modal.files,
            vec![
                "templates/greeble/modal.html",
                "static/greeble/modal.css",
                "docs/modal.md"
            ]
        );
        assert_eq!(modal.title, "Modal dialog");
        assert_eq!(modal.summary, "Accessible modal");
    }

    #[test]
    fn missing_title_defaults_to_title_cased_key() {
        let (_dir, path) = write_manifest(VALID);
        let manifest = load_manifest(&path).unwrap();
        let component = manifest.get("form-validated").unwrap();
        assert_eq!(component.title, "Form-Validated");
        assert_eq!(component.summary, "");
        assert!(component.files.is_empty());
    }

    #[test]
    fn root_is_manifest_directory() {
        let (dir, path) = write_manifest(VALID);
        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.root, dunce::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn tokens_file_resolves_against_root() {
        let (_dir, path) = write_manifest(VALID);
        let manifest = load_manifest(&path).unwrap();
        assert_eq!(
            manifest.tokens_file().unwrap(),
            manifest
                .root
                .join("packages/greeble_core/assets/css/greeble-core.css")
        );
        assert_eq!(
            manifest.library.packages,
            Some(vec!["greeble_core".to_string()])
        );
    }

    #[test]
    fn library_is_optional() {
        let (_dir, path) = write_manifest("version: 2\ncomponents: []\n");
        let manifest = load_manifest(&path).unwrap();
        assert!(manifest.components.is_empty());
        assert!(manifest.tokens_file().is_none());
    }

    #[test]
    fn unknown_component_lists_available_keys() {
        let (_dir, path) = write_manifest(VALID);
        let manifest = load_manifest(&path).unwrap();
        let err = manifest.get("nope").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown component 'nope'. Available: button, form-validated, modal"
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_manifest(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { .. }));
    }

    #[test]
    fn root_must_be_mapping() {
        let err = expect_invalid("- just\n- a list\n");
        assert!(err.to_string().contains("root must be a mapping"), "{err}");
    }

    #[test]
    fn rejects_unknown_top_level_key() {
        let err = expect_invalid("version: 1\ncomponents: []\nextra: true\n");
        assert!(matches!(err, ManifestError::Parse { .. }));
        assert!(err.to_string().contains("extra"), "{err}");
    }

    #[test]
    fn version_must_be_integer() {
        let err = expect_invalid("version: \"1\"\ncomponents: []\n");
        assert!(matches!(err, ManifestError::Parse { .. }));
    }

    #[test]
    fn version_must_be_positive() {
        let err = expect_invalid("version: 0\ncomponents: []\n");
        assert!(matches!(err, ManifestError::Invalid { .. }));
    }

    #[test]
    fn components_must_be_list() {
        let err = expect_invalid("version: 1\ncomponents: {button: {}}\n");
        assert!(matches!(err, ManifestError::Parse { .. }));
    }

    #[test]
    fn component_entry_must_be_mapping() {
        let err = expect_invalid("version: 1\ncomponents: [button]\n");
        assert!(matches!(err, ManifestError::Parse { .. }));
    }

    #[test]
    fn component_requires_key() {
        let err = expect_invalid("version: 1\ncomponents:\n  - title: Button\n");
        assert!(err.to_string().contains("key"), "{err}");
    }

    #[test]
    fn component_rejects_unknown_fields() {
        let err = expect_invalid("version: 1\ncomponents:\n  - key: button\n    colour: red\n");
        assert!(err.to_string().contains("colour"), "{err}");
    }

    #[test]
    fn files_must_be_list_of_strings() {
        let err = expect_invalid("version: 1\ncomponents:\n  - key: a\n    files: templates/a.html\n");
        assert!(matches!(err, ManifestError::Parse { .. }));

        let err = expect_invalid("version: 1\ncomponents:\n  - key: a\n    files: [[templates/a.html]]\n");
        assert!(matches!(err, ManifestError::Parse { .. }));
    }

    #[test]
    fn rejects_duplicate_keys() {
        let err = expect_invalid(
            "version: 1\ncomponents:\n  - key: button\n  - key: button\n",
        );
        assert!(err.to_string().contains("duplicate component key 'button'"), "{err}");
    }

    #[test]
    fn rejects_traversal_at_load_time() {
        let err = expect_invalid(
            "version: 1\ncomponents:\n  - key: evil\n    files: [templates/../../etc/passwd]\n",
        );
        assert!(matches!(err, ManifestError::Invalid { .. }));
        assert!(err.to_string().contains("templates/../../etc/passwd"), "{err}");
    }

    #[test]
    fn library_must_be_mapping_with_known_keys() {
        let err = expect_invalid("version: 1\ncomponents: []\nlibrary: [a]\n");
        assert!(matches!(err, ManifestError::Parse { .. }));

        let err = expect_invalid("version: 1\ncomponents: []\nlibrary:\n  theme: dark\n");
        assert!(err.to_string().contains("theme"), "{err}");

        let err = expect_invalid("version: 1\ncomponents: []\nlibrary:\n  packages: core\n");
        assert!(matches!(err, ManifestError::Parse { .. }));

        let err = expect_invalid("version: 1\ncomponents: []\nlibrary:\n  tokens_file: [a]\n");
        assert!(matches!(err, ManifestError::Parse { .. }));
    }

    #[test]
    fn all_semantic_violations_are_reported_together() {
        let err = expect_invalid(
            r"
version: 1
components:
  - key: a
    files: [/abs/a.html, scripts/a.js, templates]
  - key: a
",
        );
        let ManifestError::Invalid { violations, .. } = err else {
            panic!("expected Invalid, got {err:?}");
        };
        assert_eq!(violations.len(), 4, "{violations:?}");
    }

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("button"), "Button");
        assert_eq!(title_case("infinite-list"), "Infinite-List");
        assert_eq!(title_case("step_progress"), "Step_Progress");
        assert_eq!(title_case("h2o"), "H2O");
    }

    #[test]
    fn namespace_round_trips_segment() {
        for ns in Namespace::ALL {
            assert_eq!(Namespace::from_segment(ns.as_str()), Some(ns));
        }
        assert_eq!(Namespace::from_segment("scripts"), None);
    }
}
