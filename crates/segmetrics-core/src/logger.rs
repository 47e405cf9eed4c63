//! Logging bootstrap for binaries and tests that embed the metrics engine.
//!
//! `init_with_level` installs a stderr backend for the `log` facade. Records
//! from the metric passes are tagged with their pass name, so a line reads
//! `[  0.004s DEBUG reference] otsu threshold 87 over 4096 pixels`.
//! Records from other crates keep their full target.

use std::fmt;
use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

/// `EnvFilter` directives used by `init_tracing` when `RUST_LOG` is unset.
#[cfg(feature = "tracing")]
pub const DEFAULT_TRACING_FILTER: &str = "segmetrics=info,segmetrics_core=info";

const CRATE_PREFIXES: [&str; 2] = ["segmetrics_core::", "segmetrics::"];

/// Short tag for a record target: the module path below the crate root for
/// this workspace's crates, the target unchanged otherwise.
fn pass_tag(target: &str) -> &str {
    CRATE_PREFIXES
        .iter()
        .find_map(|prefix| target.strip_prefix(prefix))
        .unwrap_or(target)
}

fn format_line(elapsed: f64, level: Level, target: &str, args: &fmt::Arguments<'_>) -> String {
    format!("[{elapsed:8.3}s {level:>5} {}] {args}", pass_tag(target))
}

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            self.started.elapsed().as_secs_f64(),
            record.level(),
            record.target(),
            record.args(),
        );
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger with the provided level filter.
///
/// Only the first call installs a logger; later calls keep its level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| StderrLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Install a global `tracing` subscriber that reports the engine's pass spans
/// as they close, with their durations.
///
/// Filtering follows `RUST_LOG`, falling back to [`DEFAULT_TRACING_FILTER`].
/// Returns `false` if a global subscriber was already installed. `log`
/// records are not bridged; pair with [`init_with_level`] to see them.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) -> bool {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TRACING_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let installed = if json {
        let subscriber = builder.json().flatten_event(true).finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = builder
            .with_timer(tracing_subscriber::fmt::time::Uptime::default())
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };
    installed.is_ok()
}
