//! Structured logger for command output.
use std::path::{Path, PathBuf};

use super::utils::log_file_path;

/// Target for stage headers.
pub(super) const STAGE_TARGET: &str = "greeble::stage";

/// Target for dry-run previews.
pub(super) const DRY_RUN_TARGET: &str = "greeble::dry_run";

/// Structured logger used by command handlers.
///
/// Every message is a [`tracing`] event; the subscriber installed by
/// [`init_subscriber`](super::subscriber::init_subscriber) renders it on the
/// console and appends it to `$XDG_CACHE_HOME/greeble/<command>.log`
/// (default `~/.cache/greeble/<command>.log`) with timestamps and ANSI codes
/// stripped.
#[derive(Debug)]
pub struct Logger {
    log_file: Option<PathBuf>,
}

#[allow(clippy::unused_self)]
impl Logger {
    /// Create a logger for `command`.
    ///
    /// Only records the log file path; the file itself is created by the
    /// subscriber's file layer.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub fn log_path(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Log `header` followed by one `  - item` line per entry.
    ///
    /// Nothing is logged when `items` is empty.
    pub fn list<I, T>(&self, header: &str, items: I)
    where
        I: IntoIterator<Item = T>,
        T: std::fmt::Display,
    {
        let mut items = items.into_iter().peekable();
        if items.peek().is_none() {
            return;
        }
        self.info(header);
        for item in items {
            self.info(&format!("  - {item}"));
        }
    }

    /// Point at the log file for this run, at debug level.
    pub fn log_location(&self) {
        if let Some(path) = &self.log_file {
            self.debug(&format!("log: {}", path.display()));
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use crate::logging::isolated_logger;
    use std::fs;

    fn contents(log: &super::Logger) -> String {
        fs::read_to_string(log.log_path().expect("log path")).unwrap()
    }

    #[test]
    fn log_file_is_created() {
        let (log, _tmp, _guard) = isolated_logger();
        let path = log.log_path().expect("log path should exist");
        assert!(path.exists(), "log file should be created by the file layer");
    }

    #[test]
    fn debug_always_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("debug-marker-{}", std::process::id());
        log.debug(&marker);
        assert!(contents(&log).contains(&marker));
    }

    #[test]
    fn warn_and_error_are_tagged() {
        let (log, _tmp, _guard) = isolated_logger();
        log.warn("tokens missing");
        log.error("copy failed");
        let text = contents(&log);
        assert!(text.contains("[warn] tokens missing"), "{text}");
        assert!(text.contains("[error] copy failed"), "{text}");
    }

    #[test]
    fn stage_written_with_arrow() {
        let (log, _tmp, _guard) = isolated_logger();
        log.stage("Copying button");
        assert!(contents(&log).contains("==> Copying button"));
    }

    #[test]
    fn dry_run_written_with_tag() {
        let (log, _tmp, _guard) = isolated_logger();
        log.dry_run("a.html -> b.html");
        assert!(contents(&log).contains("[dry run] a.html -> b.html"));
    }

    #[test]
    fn list_writes_header_and_items() {
        let (log, _tmp, _guard) = isolated_logger();
        log.list("Copied 2 file(s):", ["templates/a.html", "static/a.css"]);
        let text = contents(&log);
        assert!(text.contains("Copied 2 file(s):"));
        assert!(text.contains("  - templates/a.html"));
        assert!(text.contains("  - static/a.css"));
    }

    #[test]
    fn empty_list_writes_nothing() {
        let (log, _tmp, _guard) = isolated_logger();
        log.list("Skipped missing files:", Vec::<String>::new());
        assert!(!contents(&log).contains("Skipped missing files:"));
    }
}
