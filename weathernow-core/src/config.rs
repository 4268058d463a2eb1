use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::app::Theme;

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "WEATHERNOW_API_KEY";

pub const DEFAULT_PLACE: &str = "London";

/// Samples requested per forecast (3-hourly, about a week).
pub const DEFAULT_FORECAST_COUNT: u32 = 56;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_place = "Lisbon"
/// theme = "dark"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,

    /// Override for the provider endpoint, mostly for testing.
    pub base_url: Option<String>,

    pub default_place: Option<String>,

    pub forecast_count: Option<u32>,

    pub theme: Theme,
}

impl Config {
    /// Load config from the platform config directory, or return an empty
    /// default if it doesn't exist yet. `WEATHERNOW_API_KEY` replaces the
    /// stored key when set.
    pub fn load() -> Result<Self> {
        let cfg = Self::load_from(&Self::config_file_path()?)?;
        Ok(cfg.with_api_key_override(std::env::var(API_KEY_ENV).ok()))
    }

    /// Replaces the stored key with `key` unless it is absent or blank.
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weathernow", "weathernow")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// The configured API key. Blank values count as unset.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn default_place(&self) -> &str {
        self.default_place
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_PLACE)
    }

    pub fn forecast_count(&self) -> u32 {
        self.forecast_count.filter(|n| *n > 0).unwrap_or(DEFAULT_FORECAST_COUNT)
    }
}
