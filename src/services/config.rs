use crate::error::{Result, ScanError};
use crate::models::config::AppConfig;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "license-scanner";
const CONFIG_FILE: &str = "config.json";

/// Loads and saves the JSON settings file
pub struct ConfigManager {
    config_dir: PathBuf,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Manager for the platform config directory.
    ///
    /// The directory itself is created lazily on the first save.
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ScanError::Config("Failed to determine config directory".to_string()))?
            .join(APP_DIR);

        Ok(Self::with_dir(config_dir))
    }

    /// Manager for an explicit config file, e.g. from `--config`
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        let config_path = config_path.into();
        let config_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Self {
            config_dir,
            config_path,
        }
    }

    fn with_dir(config_dir: PathBuf) -> Self {
        let config_path = config_dir.join(CONFIG_FILE);
        Self {
            config_dir,
            config_path,
        }
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        if !self.config_dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.config_dir)?;
        }

        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, json)?;

        tracing::debug!(path = %self.config_path.display(), "config saved");
        Ok(())
    }

    /// Load and validate; a missing file yields the defaults
    pub fn load(&self) -> Result<AppConfig> {
        if !self.config_exists() {
            tracing::debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate().map_err(ScanError::Config)?;

        Ok(config)
    }

    pub fn config_file_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn config_exists(&self) -> bool {
        self.config_path.exists()
    }
}
