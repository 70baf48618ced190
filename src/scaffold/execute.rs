//! Copy and remove planned files.
use std::path::PathBuf;

use crate::error::ScaffoldError;

use super::CopyPlan;
use super::fs::{copy_file, is_occupied};

/// Outcome of [`remove_files`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Removal {
    /// Destinations that existed (and were deleted unless dry-run).
    pub removed: Vec<PathBuf>,
    /// Destinations that were already absent.
    pub missing: Vec<PathBuf>,
}

/// Copy every plan's source to its destination.
///
/// Without `force`, every destination is checked before the first copy so a
/// collision leaves the project untouched. A dry run performs no I/O at all
/// and returns the intended destinations.
///
/// # Errors
///
/// Returns [`ScaffoldError::AlreadyExists`] when a destination exists and
/// `force` is false, or [`ScaffoldError::Io`] when a copy fails.
pub fn execute_plan(
    plans: &[CopyPlan],
    force: bool,
    dry_run: bool,
) -> Result<Vec<PathBuf>, ScaffoldError> {
    if dry_run {
        return Ok(plans.iter().map(|p| p.destination.clone()).collect());
    }

    if !force
        && let Some(existing) = plans.iter().find(|p| is_occupied(&p.destination))
    {
        return Err(ScaffoldError::AlreadyExists {
            path: existing.destination.clone(),
        });
    }

    let mut written = Vec::with_capacity(plans.len());
    for plan in plans {
        copy_file(&plan.source, &plan.destination)?;
        tracing::debug!(
            "copied {} -> {}",
            plan.source.display(),
            plan.destination.display()
        );
        written.push(plan.destination.clone());
    }
    Ok(written)
}

/// Delete every planned destination that exists.
///
/// Absent destinations are reported in [`Removal::missing`] and are never an
/// error, so removing twice is harmless.
///
/// # Errors
///
/// Returns [`ScaffoldError::Io`] when an existing file cannot be deleted.
pub fn remove_files(plans: &[CopyPlan], dry_run: bool) -> Result<Removal, ScaffoldError> {
    let mut removal = Removal::default();
    for plan in plans {
        let destination = &plan.destination;
        if !is_occupied(destination) {
            removal.missing.push(destination.clone());
            continue;
        }
        if !dry_run {
            std::fs::remove_file(destination)
                .map_err(ScaffoldError::io("remove", destination))?;
            tracing::debug!("removed {}", destination.display());
        }
        removal.removed.push(destination.clone());
    }
    Ok(removal)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn plans(dir: &Path) -> Vec<CopyPlan> {
        let lib = dir.join("lib");
        fs::create_dir_all(&lib).unwrap();
        fs::write(lib.join("button.html"), "<button/>").unwrap();
        fs::write(lib.join("button.css"), ".b{}").unwrap();
        vec![
            CopyPlan {
                source: lib.join("button.html"),
                destination: dir.join("p/templates/button.html"),
            },
            CopyPlan {
                source: lib.join("button.css"),
                destination: dir.join("p/static/button.css"),
            },
        ]
    }

    #[test]
    fn copies_in_plan_order() {
        let dir = tempfile::tempdir().unwrap();
        let plans = plans(dir.path());
        let written = execute_plan(&plans, false, false).unwrap();

        assert_eq!(written, vec![plans[0].destination.clone(), plans[1].destination.clone()]);
        assert_eq!(fs::read_to_string(&written[0]).unwrap(), "<button/>");
        assert_eq!(fs::read_to_string(&written[1]).unwrap(), ".b{}");
    }

    #[test]
    fn dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let plans = plans(dir.path());
        let written = execute_plan(&plans, false, true).unwrap();

        assert_eq!(written.len(), 2);
        assert!(!dir.path().join("p").exists());
    }

    #[test]
    fn existing_destination_requires_force() {
        let dir = tempfile::tempdir().unwrap();
        let plans = plans(dir.path());
        execute_plan(&plans, false, false).unwrap();
        fs::write(&plans[1].destination, "edited").unwrap();

        let err = execute_plan(&plans, false, false).unwrap_err();
        assert!(err.to_string().starts_with("File already exists: "), "{err}");
        assert_eq!(fs::read_to_string(&plans[1].destination).unwrap(), "edited");

        execute_plan(&plans, true, false).unwrap();
        assert_eq!(fs::read_to_string(&plans[1].destination).unwrap(), ".b{}");
    }

    #[test]
    fn collision_is_detected_before_any_copy() {
        let dir = tempfile::tempdir().unwrap();
        let plans = plans(dir.path());
        fs::create_dir_all(plans[1].destination.parent().unwrap()).unwrap();
        fs::write(&plans[1].destination, "mine").unwrap();

        execute_plan(&plans, false, false).unwrap_err();
        assert!(!plans[0].destination.exists());
    }

    #[test]
    fn forced_copy_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let plans = plans(dir.path());
        execute_plan(&plans, true, false).unwrap();
        let first = fs::read(&plans[0].destination).unwrap();
        execute_plan(&plans, true, false).unwrap();
        assert_eq!(fs::read(&plans[0].destination).unwrap(), first);
    }

    #[test]
    fn remove_partitions_existing_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let plans = plans(dir.path());
        execute_plan(&plans[..1], false, false).unwrap();

        let removal = remove_files(&plans, false).unwrap();
        assert_eq!(removal.removed, vec![plans[0].destination.clone()]);
        assert_eq!(removal.missing, vec![plans[1].destination.clone()]);
        assert!(!plans[0].destination.exists());
    }

    #[test]
    fn remove_twice_reports_all_missing() {
        let dir = tempfile::tempdir().unwrap();
        let plans = plans(dir.path());
        execute_plan(&plans, false, false).unwrap();
        remove_files(&plans, false).unwrap();

        let again = remove_files(&plans, false).unwrap();
        assert!(again.removed.is_empty());
        assert_eq!(again.missing.len(), 2);
    }

    #[test]
    fn remove_dry_run_keeps_files() {
        let dir = tempfile::tempdir().unwrap();
        let plans = plans(dir.path());
        execute_plan(&plans, false, false).unwrap();

        let removal = remove_files(&plans, true).unwrap();
        assert_eq!(removal.removed.len(), 2);
        assert!(plans.iter().all(|p| p.destination.exists()));
    }
}
