//! Application configuration: TOML file loading and defaults.
//!
//! Resolution order (first found wins):
//! 1. `$FILE_BROWSER_CONFIG` environment variable (path to config file)
//! 2. Project-local `.file-browser.toml` in the current working directory
//! 3. Global `~/.config/file-browser/config.toml`
//! 4. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::state::pane::ViewMode;

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Starting directory (overrides the directory service's default).
    pub initial_path: Option<String>,
    /// Confirm before delete operations.
    pub confirm_delete: Option<bool>,
}

/// Pane defaults.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PaneConfig {
    /// Default view mode for new panes: "grid" or "list".
    pub view_mode: Option<String>,
    /// Maximum navigation history entries per pane.
    pub history_limit: Option<usize>,
}

/// Directory query cache settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CacheConfig {
    /// Retention window for settled listings, in milliseconds.
    pub ttl_ms: Option<u64>,
}

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub pane: PaneConfig,
    pub cache: CacheConfig,
}

impl Config {
    /// Load configuration following the resolution order. Unreadable or
    /// malformed files fall through to the next candidate.
    pub fn load() -> Self {
        for candidate in Self::candidate_paths() {
            if let Some(config) = Self::load_from_file(&candidate) {
                return config;
            }
        }
        Self::default()
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Ok(env_path) = std::env::var("FILE_BROWSER_CONFIG") {
            candidates.push(PathBuf::from(env_path));
        }
        candidates.push(PathBuf::from(".file-browser.toml"));
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("file-browser").join("config.toml"));
        }
        candidates
    }

    /// Parse a single TOML config file; `None` if missing or malformed.
    pub fn load_from_file(path: &Path) -> Option<Self> {
        let text = std::fs::read_to_string(path).ok()?;
        toml::from_str(&text).ok()
    }

    /// Effective starting-path override, if configured.
    pub fn initial_path(&self) -> Option<&str> {
        self.general.initial_path.as_deref()
    }

    /// Effective delete-confirmation setting (default on).
    pub fn confirm_delete(&self) -> bool {
        self.general.confirm_delete.unwrap_or(true)
    }

    /// Effective default view mode for new panes (default list).
    pub fn default_view_mode(&self) -> ViewMode {
        match self.pane.view_mode.as_deref() {
            Some("grid") => ViewMode::Grid,
            _ => ViewMode::List,
        }
    }

    /// Effective per-pane history cap (default 100).
    pub fn history_limit(&self) -> usize {
        self.pane.history_limit.unwrap_or(100)
    }

    /// Effective cache retention window (default 2 seconds).
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache.ttl_ms.unwrap_or(2000))
    }
}
