//! Optional TOML file for tuning gesture thresholds.
//!
//! Thresholds rarely change, and when they do it is per device (a different
//! panel size, a twitchier touchscreen).  Rather than growing the CLI, they
//! live in a small file passed with `--config`:
//!
//! ```toml
//! [gestures]
//! touch_drag_threshold = 12.0
//! tap_max_duration_ms = 250
//! ```
//!
//! # Serde default values
//!
//! Every field of `[gestures]` has a `#[serde(default = "...")]`, so a file
//! only needs to list the values it changes.  A missing `[gestures]` table
//! (or an empty file) yields the built-in defaults.

use std::path::{Path, PathBuf};

use liveview_core::GestureThresholds;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// On-disk configuration schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub gestures: GestureThresholds,
}

impl FileConfig {
    /// Reads and parses the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
