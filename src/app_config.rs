use crate::merge::{ArrayMode, MergeOptions};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct AppConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

/// Default merge options applied when the command line leaves them unset.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct DefaultsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep: Option<bool>,
    /// Kept as text so an unknown mode degrades to `default` instead of
    /// rejecting the whole file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_mode: Option<String>,
}

impl AppConfig {
    /// Load the application configuration from the default path
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Unable to determine the config directory
    /// - Unable to read the config file (other than it not existing)
    /// - The config file contains invalid TOML
    pub fn load() -> Result<Option<Self>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config at {}", config_path.display()))?;

        Ok(Some(config))
    }

    /// Get the path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if unable to determine the config directory
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
            Ok(PathBuf::from(config_home).join("extendext").join("config.toml"))
        } else if let Some(proj_dirs) = ProjectDirs::from("", "", "extendext") {
            Ok(proj_dirs.config_dir().join("config.toml"))
        } else {
            anyhow::bail!("Could not determine config directory")
        }
    }

    /// Merge options described by the `[defaults]` table.
    pub fn merge_options(&self) -> MergeOptions {
        let defaults = self.defaults.clone().unwrap_or_default();
        MergeOptions {
            deep: defaults.deep.unwrap_or_default(),
            array_mode: defaults
                .array_mode
                .as_deref()
                .map_or(ArrayMode::Default, ArrayMode::parse_lenient),
        }
    }
}
