//! Semantic manifest rules checked after deserialization.
//!
//! Structure and types are already enforced by serde. The rules here need
//! the whole document (duplicate keys) or inspect string contents (file
//! entry grammar), and every violation is collected rather than stopping at
//! the first one.
use std::collections::HashSet;
use std::path::Path;

use super::{Namespace, RawManifest};

/// Minimum number of `/`-separated segments in a file entry.
const MIN_ENTRY_SEGMENTS: usize = 2;

/// Check every semantic rule and return the violations in document order.
///
/// An empty result means the manifest is valid.
pub(crate) fn validate(raw: &RawManifest) -> Vec<String> {
    let mut violations = Vec::new();

    if raw.version <= 0 {
        violations.push(format!(
            "'version' must be a positive integer (got {})",
            raw.version
        ));
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for component in &raw.components {
        let key = component.key.as_str();
        if key.trim().is_empty() {
            violations.push("component 'key' must not be empty".to_string());
        } else if !seen.insert(key) {
            violations.push(format!("duplicate component key '{key}'"));
        }

        for entry in &component.files {
            if let Err(reason) = check_file_entry(entry) {
                violations.push(format!("component '{key}': file '{entry}' {reason}"));
            }
        }
    }

    violations
}

/// Validate the grammar `<namespace>/<...>/<filename>` for one file entry.
///
/// # Errors
///
/// Returns the reason the entry is rejected.
pub(crate) fn check_file_entry(entry: &str) -> Result<Namespace, &'static str> {
    if entry.starts_with('/') || entry.starts_with('\\') || Path::new(entry).is_absolute() {
        return Err("must be a relative path");
    }

    let segments: Vec<&str> = entry.split('/').collect();
    if segments.len() < MIN_ENTRY_SEGMENTS {
        return Err("must have at least two path segments");
    }

    let namespace = segments
        .first()
        .and_then(|first| Namespace::from_segment(first))
        .ok_or("must start with one of: docs, static, templates")?;

    if segments
        .iter()
        .any(|s| s.is_empty() || *s == "." || *s == ".." || s.contains('\\'))
    {
        return Err("must not contain empty, '.', '..' or backslash segments");
    }

    Ok(namespace)
}
