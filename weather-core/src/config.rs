use anyhow::{Context, Result, anyhow, ensure};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use tracing::warn;

use crate::{failure::RandomFailures, model::WeatherReport};

/// Simulation settings stored on disk.
///
/// Example TOML:
/// ```toml
/// fetch_delay_ms = 2000
/// submit_delay_ms = 3000
/// failure_probability = 0.5
/// fetch_city = "Armenia"
///
/// [submit]
/// city = "Guatemala"
/// temperature = 23.5
/// condition = "Windy"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetch_delay_ms: u64,
    pub submit_delay_ms: u64,
    /// Chance, per call, that a simulated remote call fails.
    pub failure_probability: f64,
    /// City looked up by the fetch task.
    pub fetch_city: String,
    /// Report sent by the submit task.
    pub submit: WeatherReport,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch_delay_ms: 2_000,
            submit_delay_ms: 3_000,
            failure_probability: RandomFailures::DEFAULT_PROBABILITY,
            fetch_city: "Armenia".to_string(),
            submit: WeatherReport::new("Guatemala", 23.5, "Windy"),
        }
    }
}

impl Config {
    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_delay_ms)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.failure_probability),
            "failure_probability must be between 0.0 and 1.0, got {}",
            self.failure_probability
        );
        ensure!(!self.fetch_city.trim().is_empty(), "fetch_city must not be empty");
        ensure!(!self.submit.city.trim().is_empty(), "submit.city must not be empty");
        Ok(())
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Like [`Config::load`], but falls back to defaults when the platform has
    /// no config directory (e.g. `HOME` unset). A file that exists but cannot be
    /// read or parsed is still an error.
    pub fn load_or_default() -> Result<Self> {
        Self::load_or_default_at(Self::config_file_path())
    }

    fn load_or_default_at(path: Result<PathBuf>) -> Result<Self> {
        match path {
            Ok(path) => Self::load_from(&path),
            Err(err) => {
                warn!(error = %err, "no config directory, using default settings");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

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
        let dirs = ProjectDirs::from("dev", "weather-sim", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
