//! Session settings
//!
//! Stored as JSON in the user's config directory:
//! - Linux: ~/.config/image-guard/settings.json
//! - macOS: ~/Library/Application Support/image-guard/settings.json
//! - Windows: %APPDATA%\image-guard\settings.json

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::state::data::Viewer;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a config directory")]
    NoConfigDir,

    #[error("failed to read settings {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Sign-in entry point the prompt links to
    pub auth_path: String,
    /// Path the viewer returns to after signing in
    pub current_path: String,
    /// Session as reported by the identity provider
    pub viewer: Viewer,
    /// Feed to open on startup, the built-in demo feed otherwise
    pub feed_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auth_path: "/login".to_string(),
            current_path: "/".to_string(),
            viewer: Viewer::anonymous(),
            feed_path: None,
        }
    }
}

impl Settings {
    /// Load settings from the default location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::settings_path()?)
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&json)?;

        info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Get the path where the settings file is stored
    pub fn settings_path() -> Result<PathBuf, ConfigError> {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or(ConfigError::NoConfigDir)?;

        path.push("image-guard");
        path.push("settings.json");
        Ok(path)
    }
}
