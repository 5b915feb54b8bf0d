//! Application configuration file support.
//!
//! Reads `timetable.toml`: a `[repository]` section selecting the storage
//! backend and an `[engine]` section tuning the generation search. Every
//! setting has a default, so a missing file or section still yields a
//! working configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::db::factory::RepositoryType;
use crate::db::repository::RepositoryError;
use crate::engine::EngineConfig;

/// Application configuration from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
        }
    }
}

fn default_repo_type() -> String {
    "local".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `timetable.toml` in the current directory and its
    /// parent; falls back to defaults when none exists.
    pub fn from_default_location() -> Self {
        let search_paths = [
            PathBuf::from("timetable.toml"),
            PathBuf::from("../timetable.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return config,
                    Err(e) => {
                        log::warn!("ignoring unreadable config {}: {}", path.display(), e);
                    }
                }
            }
        }

        Self::default()
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }
}
