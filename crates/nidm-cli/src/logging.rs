//! Console and per-run file logging.
//!
//! Console verbosity follows `--quiet`/`--verbose`. The file under
//! `<output_dir>/logs/` always records at least `info`. `MRIQC_NIDM_LOG`
//! overrides both filters.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Local};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::cli::GlobalFlags;

const LOG_ENV: &str = "MRIQC_NIDM_LOG";

/// File name of the run log started at `now`, without the `.log` suffix.
#[must_use]
pub fn log_file_stem(now: DateTime<Local>) -> String {
    format!("mriqc-nidm-{}", now.format("%Y%m%d-%H%M%S"))
}

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the subscriber. Keep the guard until the run ends so buffered
/// lines reach the file.
pub fn init(flags: &GlobalFlags, log_dir: &Path) -> anyhow::Result<(WorkerGuard, PathBuf)> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let stem = log_file_stem(Local::now());
    let path = log_dir.join(format!("{stem}.log"));
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(stem)
        .filename_suffix("log")
        .build(log_dir)
        .with_context(|| format!("failed to open run log {}", path.display()))?;

    let console_level = if flags.quiet {
        "error"
    } else if flags.verbose {
        "debug"
    } else {
        "warn"
    };
    let file_level = if flags.verbose { "debug" } else { "info" };

    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter(console_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_target(true)
                .with_ansi(false)
                .with_filter(filter(file_level)),
        )
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok((guard, path))
}
