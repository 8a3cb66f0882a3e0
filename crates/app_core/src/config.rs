//! Application configuration

use crate::error::Result;
use crate::loading::{LoadingPolicy, StaggeredDelay};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub gallery: GalleryConfig,
    pub loading: LoadingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the platform data directory for persistent preferences
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Session storage key holding the gallery snapshot
    pub session_key: String,
    pub default_query: String,
    pub per_page: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            session_key: crate::gallery::GALLERY_STORAGE_KEY.to_string(),
            default_query: "landscape".to_string(),
            per_page: crate::search::DEFAULT_PER_PAGE,
        }
    }
}

/// Loading simulator configuration; one mode per deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
    pub mode: LoadingMode,
    /// Stagger step for timer mode; key `n` clears after `(n + 1) * base`
    pub base_interval_ms: u64,
    /// Key driven by gallery data in data-driven mode
    pub trigger_key: String,
    /// Known project keys, in display order
    pub projects: Vec<String>,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            mode: LoadingMode::Timer,
            base_interval_ms: 1000,
            trigger_key: "gallery".to_string(),
            projects: ["todo", "chat", "form", "gallery"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadingMode {
    #[serde(rename = "timer")]
    Timer,
    #[serde(rename = "data-driven")]
    DataDriven,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub console: bool,
    /// Log files older than this are pruned at startup
    pub retain_days: u32,
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: true,
            retain_days: 7,
            log_dir: None,
        }
    }
}

impl LoggingConfig {
    /// Options for `app_log::init`
    pub fn log_options(&self) -> app_log::LogOptions {
        app_log::LogOptions {
            level: self.level.clone(),
            console: self.console,
            log_dir: self.log_dir.clone().unwrap_or_else(app_log::log_dir),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| crate::AppError::Config(e.to_string()))?;
            let config: Self = toml::from_str(&content)?;
            tracing::info!("Configuration loaded from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    /// Load `path`, falling back to the defaults when it cannot be read.
    ///
    /// The load error is handed back so the caller can report it once logging
    /// is up.
    pub fn load_or_default(path: &Path) -> (Self, Option<crate::AppError>) {
        match Self::load_from(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let io_err = |e: std::io::Error| crate::AppError::Config(e.to_string());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(io_err)?;

        tracing::info!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("dev", "Folio", "Folio")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("./config.toml"))
    }

    /// Directory of the persistent preference store
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(app_storage::data_dir)
    }

    /// The loading policy selected for this deployment
    pub fn loading_policy(&self) -> LoadingPolicy {
        match self.loading.mode {
            LoadingMode::Timer => LoadingPolicy::Timer(StaggeredDelay::new(Duration::from_millis(
                self.loading.base_interval_ms,
            ))),
            LoadingMode::DataDriven => LoadingPolicy::DataDriven {
                trigger_key: self.loading.trigger_key.clone(),
            },
        }
    }
}
