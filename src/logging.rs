//! Logging setup
//!
//! The terminal is owned by the UI, so all `tracing` output goes to a log
//! file instead (`orgsearch.log` next to the executable unless configured).
//! The file is truncated at the start of every run.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Pick the log level from `-v` occurrences, falling back to the configured
/// level name when no flag was given
pub fn level_for(verbosity: u8, configured: &str) -> Level {
    match verbosity {
        0 => configured.parse().unwrap_or(Level::INFO),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Default log file path (same directory as executable)
pub fn default_log_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("orgsearch.log")
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("orgsearch={}", level.as_str().to_lowercase())))
}

/// Initialize the global subscriber.
///
/// Returns the path actually written to, or `None` when the file could not
/// be opened (logging is then disabled rather than spilling onto the UI).
pub fn init(level: Level, path: Option<&Path>) -> Option<PathBuf> {
    let log_path = path.map(Path::to_path_buf).unwrap_or_else(default_log_path);
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)
        .ok()?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok();

    installed.then_some(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_configured_level() {
        assert_eq!(level_for(0, "warn"), Level::WARN);
        assert_eq!(level_for(0, "nonsense"), Level::INFO);
        assert_eq!(level_for(1, "warn"), Level::DEBUG);
        assert_eq!(level_for(3, "error"), Level::TRACE);
    }

    #[test]
    fn default_path_is_named_after_the_crate() {
        assert!(default_log_path().ends_with("orgsearch.log"));
    }
}
