//! Tracing setup: an optional console layer plus JSON log files

use crate::core::Mode;
use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Environment variable holding the log filter
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

/// Ceiling for the console layer
///
/// The CLI already prints one line per step event, so by default the console
/// only shows warnings and errors. `--verbose` or an explicit `LOG_LEVEL`
/// leaves it to the global filter.
pub fn console_level(verbose: bool, log_level: Option<&str>) -> LevelFilter {
    let explicit = log_level.is_some_and(|l| !l.trim().is_empty());
    if verbose || explicit {
        LevelFilter::TRACE
    } else {
        LevelFilter::WARN
    }
}

/// Whether a console layer is installed at all (production stays quiet unless verbose)
pub fn console_enabled(verbose: bool, mode: Mode) -> bool {
    verbose || mode == Mode::Development
}

/// Install the global subscriber
pub fn init_logging(verbose: bool, mode: Mode, log_dir: Option<&Path>) -> Result<()> {
    let log_level = std::env::var(LOG_LEVEL_VAR).ok();
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_LEVEL_VAR).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let console = console_enabled(verbose, mode).then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(console_level(verbose, log_level.as_deref()))
    });

    let (combined, errors) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let combined = fmt::layer()
                .json()
                .with_writer(Mutex::new(open_log(&dir.join("combined.log"))?));
            let errors = fmt::layer()
                .json()
                .with_writer(Mutex::new(open_log(&dir.join("error.log"))?))
                .with_filter(LevelFilter::ERROR);
            (Some(combined), Some(errors))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(combined)
        .with(errors)
        .try_init()
        .context("Failed to set logging subscriber")?;
    Ok(())
}

fn open_log(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}
