//! Application configuration
//!
//! Settings come from a TOML file (explicit `--config` path, or the global
//! `orgsearch.toml` in the platform's per-application config directory) and
//! are then overridden by command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{OrgSearchError, Result};

/// Longest accepted debounce window
const MAX_DEBOUNCE_MS: u64 = 5_000;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the organizer backend
    pub backend_url: String,
    /// Quiet period after the last keystroke before a query is sent
    pub debounce_ms: u64,
    /// Time a query may stay in flight before it counts as failed
    pub timeout_secs: u64,
    /// Maximum number of result items kept from one response
    pub max_results: usize,
    /// Default log level (overridden by `-v` and `RUST_LOG`)
    pub log_level: String,
    /// Log file location; defaults to `orgsearch.log` next to the executable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:5000".to_string(),
            debounce_ms: 300,
            timeout_secs: 10,
            max_results: 200,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

/// Timing knobs for the search controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub debounce: Duration,
    pub timeout: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            timeout: Duration::from_secs(10),
        }
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the global config file is
    /// used when present and defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_file(path),
            None => match global_config_path() {
                Some(path) if path.exists() => Self::load_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parse a TOML config file
    pub fn load_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            OrgSearchError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: AppConfig = toml::from_str(&raw)?;
        Ok(config)
    }

    /// Render as TOML (used by `orgsearch config`)
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| OrgSearchError::Config(format!("cannot serialize config: {}", e)))
    }

    /// Reject values the controller or the HTTP client cannot work with
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.backend_url).map_err(|e| {
            OrgSearchError::Config(format!("backend_url '{}': {}", self.backend_url, e))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(OrgSearchError::Config(format!(
                "backend_url '{}' must use http or https",
                self.backend_url
            )));
        }
        if self.debounce_ms == 0 || self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(OrgSearchError::Config(format!(
                "debounce_ms must be between 1 and {}, got {}",
                MAX_DEBOUNCE_MS, self.debounce_ms
            )));
        }
        if self.timeout_secs == 0 {
            return Err(OrgSearchError::Config("timeout_secs must be at least 1".into()));
        }
        if self.max_results == 0 {
            return Err(OrgSearchError::Config("max_results must be at least 1".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            debounce: Duration::from_millis(self.debounce_ms),
            timeout: self.timeout(),
        }
    }
}

/// Location of the global config file, if the platform has a config directory
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "orgsearch")
        .map(|dirs| dirs.config_dir().join("orgsearch.toml"))
}

/// Where the settings in effect were read from, for display
pub fn config_source(explicit: Option<&Path>) -> String {
    if let Some(path) = explicit {
        return path.display().to_string();
    }
    match global_config_path() {
        Some(path) if path.exists() => path.display().to_string(),
        Some(path) => format!("defaults ({} not found)", path.display()),
        None => "defaults".to_string(),
    }
}
