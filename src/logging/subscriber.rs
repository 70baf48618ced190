//! Tracing subscriber: one event format, rendered for the console and for
//! the per-command log file.
use std::fs;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter::LevelFilter, fmt};

use super::logger::{DRY_RUN_TARGET, STAGE_TARGET};
use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

/// The `message` field of an event.
#[derive(Default)]
struct Message(String);

impl tracing::field::Visit for Message {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

#[derive(Clone, Copy)]
pub(super) enum Sink {
    Console,
    File,
}

/// Renders greeble events: coloured tags on the console, timestamped plain
/// lines in the log file.
pub(super) struct GreebleFormat(pub(super) Sink);

impl<S, N> FormatEvent<S, N> for GreebleFormat
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let mut message = Message::default();
        event.record(&mut message);
        let level = *event.metadata().level();
        let target = event.metadata().target();
        let msg = message.0;

        match self.0 {
            Sink::Console => match level {
                Level::ERROR => writeln!(writer, "\x1b[31merror:\x1b[0m {msg}"),
                Level::WARN => writeln!(writer, "\x1b[33mwarning:\x1b[0m {msg}"),
                Level::INFO if target == STAGE_TARGET => {
                    writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m")
                }
                Level::INFO if target == DRY_RUN_TARGET => {
                    writeln!(writer, "\x1b[33m[DRY RUN]\x1b[0m {msg}")
                }
                Level::INFO => writeln!(writer, "{msg}"),
                _ => writeln!(writer, "\x1b[2m{msg}\x1b[0m"),
            },
            Sink::File => {
                let tag = match (level, target) {
                    (Level::INFO, STAGE_TARGET) => "==> ",
                    (Level::INFO, DRY_RUN_TARGET) => "    [dry run] ",
                    (Level::ERROR, _) => "    [error] ",
                    (Level::WARN, _) => "    [warn] ",
                    (Level::DEBUG, _) => "    [debug] ",
                    _ => "    ",
                };
                writeln!(writer, "[{}] {tag}{}", format_utc_time(), strip_ansi(&msg))
            }
        }
    }
}

/// Truncate the log file for `command`, write a run header, and return it
/// ready for appending.
///
/// Returns `None` if the cache directory or the file is unavailable.
pub(super) fn open_log_file(command: &str) -> Option<Mutex<fs::File>> {
    let path = log_file_path(command)?;
    let header = format!(
        "==========================================\n\
         Greeble {} {command} {}\n\
         ==========================================\n",
        crate::VERSION,
        format_utc_datetime(),
    );
    fs::write(&path, header).ok()?;
    let file = fs::OpenOptions::new().append(true).open(&path).ok()?;
    Some(Mutex::new(file))
}

/// Console filter: `RUST_LOG` when set, otherwise `INFO` (`DEBUG` with
/// `verbose`).
fn console_filter(verbose: bool) -> EnvFilter {
    let default = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy()
}

/// Initialise the global [`tracing`] subscriber.
///
/// The console shows `INFO` and above (`DEBUG` with `verbose`), unless
/// `RUST_LOG` says otherwise; warnings and errors go to stderr, everything
/// else to stdout. The log file at `$XDG_CACHE_HOME/greeble/<command>.log`
/// always receives `DEBUG` and above. Must be called once, before any
/// logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console_layer = fmt::layer()
        .event_format(GreebleFormat(Sink::Console))
        .with_writer(make_writer)
        .with_filter(console_filter(verbose));

    let file_layer = open_log_file(command).map(|file| {
        fmt::layer()
            .event_format(GreebleFormat(Sink::File))
            .with_writer(file)
            .with_filter(LevelFilter::DEBUG)
    });

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
