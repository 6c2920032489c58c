//! File logging for the whole app.
//!
//! One `WriteLogger` writes to `tailored.log` beside `config.yaml`. The
//! terminal is owned by cursive, so nothing is ever logged to stdout/stderr.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Once;

use log::{LevelFilter, Log, Metadata, Record, info};
use simplelog::{ConfigBuilder, WriteLogger};

use crate::config::Config;

const LOG_FILE: &str = "tailored.log";

/// Crates whose records never reach the log file. The cursive event loop logs
/// every input event at debug level.
const DROPPED_CRATES: [&str; 2] = ["cursive", "cursive_core"];

static INIT: Once = Once::new();

/// Install the global logger.
///
/// Returns `Ok(true)` when this call installed it and `Ok(false)` when an earlier
/// call already ran (whether or not that call succeeded). Only the first call can
/// return an error. Debug builds log everything; release builds log Info and up.
pub fn init_logging() -> Result<bool, InitLogError> {
    let mut outcome = Ok(false);
    INIT.call_once(|| outcome = install(&log_file_path()).map(|()| true));
    outcome
}

fn install(path: &Path) -> Result<(), InitLogError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let mut config = ConfigBuilder::new();
    config.set_time_level(LevelFilter::Error);
    // Falls back to UTC when the local offset can't be determined.
    let _ = config.set_time_offset_to_local();

    let level = if cfg!(debug_assertions) {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    };

    let logger = CrateFilter {
        inner: WriteLogger::new(level, config.build(), file),
    };
    log::set_boxed_logger(Box::new(logger))
        .map_err(|e| InitLogError::SetLogger(e.to_string()))?;
    log::set_max_level(level);

    info!(
        "tailored {} logging to {}",
        env!("CARGO_PKG_VERSION"),
        path.display()
    );
    Ok(())
}

/// True when `target` belongs to one of `DROPPED_CRATES` (the crate itself or
/// any of its modules, but not a crate that merely shares the prefix).
fn is_dropped(target: &str) -> bool {
    DROPPED_CRATES.iter().any(|krate| {
        target
            .strip_prefix(krate)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    })
}

struct CrateFilter<L> {
    inner: Box<L>,
}

impl<L: Log> Log for CrateFilter<L> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        !is_dropped(metadata.target()) && self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

#[cfg(not(test))]
fn log_file_path() -> PathBuf {
    let config = Config::file_path();
    match config.parent() {
        Some(dir) => dir.join(LOG_FILE),
        None => PathBuf::from(LOG_FILE),
    }
}

// Tests must not write into the real config directory.
#[cfg(test)]
fn log_file_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("tailored-test-{}", std::process::id()))
        .join(LOG_FILE)
}

#[derive(Debug)]
pub enum InitLogError {
    Io(std::io::Error),
    SetLogger(String),
}

impl From<std::io::Error> for InitLogError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl std::fmt::Display for InitLogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot open log file: {e}"),
            Self::SetLogger(e) => write!(f, "cannot install logger: {e}"),
        }
    }
}

impl std::error::Error for InitLogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::SetLogger(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{error, trace};

    #[test]
    fn init_is_idempotent() {
        let first = init_logging();
        assert!(first.is_ok() || matches!(first, Err(InitLogError::SetLogger(_))));
        assert!(matches!(init_logging(), Ok(false)));
        trace!("trace after init");
        error!("error after init");
    }

    #[test]
    fn test_log_stays_out_of_config_dir() {
        let path = log_file_path();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some(LOG_FILE));
        assert!(path.starts_with(std::env::temp_dir()));
        assert_ne!(path.parent(), Config::file_path().parent());
    }

    #[test]
    fn cursive_targets_are_dropped() {
        assert!(is_dropped("cursive"));
        assert!(is_dropped("cursive::backends::crossterm"));
        assert!(is_dropped("cursive_core::cursive_run"));
        assert!(!is_dropped("cursive_extras"));
        assert!(!is_dropped("tailored::shell"));
        assert!(!is_dropped(""));
    }
}
