//! User configuration stored as TOML in the platform config directory

use std::path::{Path, PathBuf};
use std::time::Duration;

use kitslicer_core::{kit_prefix_from_name, DetectionSettings, DEFAULT_KIT_PREFIX};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub detection: DetectionSettings,
    #[serde(default)]
    pub kit: KitConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KitConfig {
    /// Kit display name, used to derive the slice-name prefix
    #[serde(default)]
    pub name: Option<String>,
    /// Explicit prefix, wins over the derived one
    #[serde(default)]
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Delay before re-detecting after a settings change
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    300
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl SessionConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl AppConfig {
    /// Explicit prefix, else initials of the kit name, else the default.
    pub fn kit_prefix(&self) -> String {
        if let Some(prefix) = self.kit.prefix.as_deref().filter(|p| !p.trim().is_empty()) {
            return prefix.trim().to_string();
        }
        match self.kit.name.as_deref() {
            Some(name) => kit_prefix_from_name(name),
            None => DEFAULT_KIT_PREFIX.to_string(),
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kitslicer")
        .join("config.toml")
}

/// Load the user config, falling back to defaults if it is missing or broken.
pub fn load_config() -> AppConfig {
    let path = config_path();
    match load_config_from(&path) {
        Ok(config) => config,
        Err(ServiceError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config");
            AppConfig::default()
        }
    }
}

/// Parse a config file. Detection settings are clamped to the UI ranges.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ServiceError> {
    let text = std::fs::read_to_string(path)?;
    let mut config: AppConfig = toml::from_str(&text)?;
    config.detection = config.detection.clamped();
    Ok(config)
}

pub fn save_config(config: &AppConfig) -> Result<(), ServiceError> {
    save_config_to(config, &config_path())
}

pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ServiceError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(config)?;
    std::fs::write(path, text)?;
    Ok(())
}
