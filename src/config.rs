//! Settings file (`config.toml`)

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::binding::DEFAULT_CACHE_CAPACITY;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub binding: BindingSettings,
    #[serde(default)]
    pub views: ViewSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingSettings {
    /// Resolutions remembered per binder kind
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

impl Default for BindingSettings {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
        }
    }
}

/// Naming conventions used to find views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    #[serde(default = "default_view_model_suffix")]
    pub view_model_suffix: String,
    #[serde(default = "default_view_suffix")]
    pub view_suffix: String,
    #[serde(default = "default_interface_prefix")]
    pub interface_prefix: String,
}

fn default_view_model_suffix() -> String {
    "ViewModel".to_string()
}

fn default_view_suffix() -> String {
    "View".to_string()
}

fn default_interface_prefix() -> String {
    "I".to_string()
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            view_model_suffix: default_view_model_suffix(),
            view_suffix: default_view_suffix(),
            interface_prefix: default_interface_prefix(),
        }
    }
}

impl Settings {
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("viewbind");
        Ok(config_dir.join("config.toml"))
    }

    /// Load settings from `path`
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading settings from: {:?}", path);

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        settings
            .validate()
            .with_context(|| format!("Invalid settings in {:?}", path))?;
        Ok(settings)
    }

    /// Load from `path` (or the default location), falling back to defaults
    /// when the file doesn't exist
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };

        if !path.exists() {
            info!("Config file {:?} doesn't exist, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn validate(&self) -> Result<()> {
        if self.binding.cache_capacity == 0 {
            anyhow::bail!("binding.cache_capacity must be at least 1");
        }
        if self.views.view_model_suffix.is_empty() {
            anyhow::bail!("views.view_model_suffix must not be empty");
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize settings to TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config("[binding]\ncache_capacity = 8\n");

        let settings = Settings::load(file.path()).unwrap();

        assert_eq!(settings.binding.cache_capacity, 8);
        assert_eq!(settings.views, ViewSettings::default());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let file = write_config("[binding]\ncache_capacity = 0\n");

        let err = Settings::load(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("cache_capacity"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_or_default(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_toml_output_parses_back() {
        let mut settings = Settings::default();
        settings.views.interface_prefix = "Abstract".to_string();

        let text = settings.to_toml().unwrap();
        let file = write_config(&text);

        assert_eq!(Settings::load(file.path()).unwrap(), settings);
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let file = write_config("binding = [");
        let err = Settings::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
