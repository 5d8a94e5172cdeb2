//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::settings::{BridgeConfig, ColorMode};
use crate::{ConfigError, ConfigResult, CONFIG_FILE_NAME};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.callback-bridge/config.toml) - lowest priority
/// 2. Project config (./bridge.toml) - overrides global
/// 3. Environment variables (CALLBACK_BRIDGE_*) - overrides project
/// 4. CLI flags - highest priority (handled by caller)
pub struct ConfigLoader {
    /// Global config path; `None` until first resolved
    global_config_path: Option<PathBuf>,
    /// Skip the global layer entirely
    skip_global: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
            skip_global: false,
        }
    }

    /// Use an explicit global config path instead of ~/.callback-bridge/config.toml
    pub fn with_global_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self.skip_global = false;
        self
    }

    /// Ignore the global config layer
    pub fn without_global(mut self) -> Self {
        self.skip_global = true;
        self
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find bridge.toml, merges it over the
    /// global config, then applies environment overrides.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<BridgeConfig> {
        let mut config = self.load_global_config()?;

        if let Some(path) = find_project_config(start_dir) {
            config.merge(&BridgeConfig::load_from_file(&path)?);
        }

        apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Load configuration from a specific bridge.toml
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<BridgeConfig> {
        let mut config = self.load_global_config()?;
        config.merge(&BridgeConfig::load_from_file(config_path)?);
        apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Load the global configuration, or defaults if it does not exist
    fn load_global_config(&mut self) -> ConfigResult<BridgeConfig> {
        if self.skip_global {
            return Ok(BridgeConfig::default());
        }

        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => match Self::global_config_path() {
                Ok(path) => {
                    self.global_config_path = Some(path.clone());
                    path
                }
                // No home directory means no global layer
                Err(ConfigError::HomeNotFound) => return Ok(BridgeConfig::default()),
                Err(e) => return Err(e),
            },
        };

        if !path.exists() {
            return Ok(BridgeConfig::default());
        }

        BridgeConfig::load_from_file(&path)
    }

    /// Get the global configuration directory (~/.callback-bridge)
    pub fn global_config_dir() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".callback-bridge"))
    }

    /// Get the global config file path (~/.callback-bridge/config.toml)
    pub fn global_config_path() -> ConfigResult<PathBuf> {
        Ok(Self::global_config_dir()?.join("config.toml"))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Find bridge.toml by walking up the directory tree
fn find_project_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current = Some(start_dir);

    while let Some(dir) = current {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = dir.parent();
    }

    None
}

/// Apply environment variable overrides
///
/// - `CALLBACK_BRIDGE_TRACE`: true/1/yes/on or false/0/no/off
/// - `CALLBACK_BRIDGE_COLOR`: auto, always, never
/// - `NO_COLOR`: forces `never` unless `CALLBACK_BRIDGE_COLOR` is set
pub fn apply_env_overrides(config: &mut BridgeConfig) -> ConfigResult<()> {
    if let Ok(trace) = env::var("CALLBACK_BRIDGE_TRACE") {
        config.set_trace(parse_bool("CALLBACK_BRIDGE_TRACE", &trace)?);
    }

    if let Ok(color) = env::var("CALLBACK_BRIDGE_COLOR") {
        config.set_color_mode(ColorMode::parse(&color)?);
    } else if env::var_os("NO_COLOR").is_some() {
        config.set_color_mode(ColorMode::Never);
    }

    Ok(())
}

fn parse_bool(field: &str, value: &str) -> ConfigResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("expected a boolean, got '{}'", other),
        }),
    }
}
