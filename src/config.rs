//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/qlist/qlist.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `QLIST_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::ApplicationError;

/// Unified configuration for qlist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// File extensions treated as property lists (default: ["plist"])
    pub extensions: Vec<String>,
    /// Depth limit for tree output, counted below the starting node
    pub max_depth: Option<usize>,
    /// Show the type column in tree output
    pub show_types: bool,
    /// Expand every branch; when false only the first level is listed
    pub expand: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            extensions: vec!["plist".into()],
            max_depth: None,
            show_types: true,
            expand: true,
        }
    }
}

/// Raw settings for intermediate parsing (every field optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub extensions: Option<Vec<String>>,
    pub max_depth: Option<usize>,
    pub show_types: Option<bool>,
    pub expand: Option<bool>,
}

/// Get the XDG config directory for qlist.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "qlist").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("qlist.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Typed lookup of one override; a value that does not parse is logged and skipped.
fn override_value<T: DeserializeOwned>(config: &Config, key: &str) -> Option<T> {
    match config.get::<T>(key) {
        Ok(value) => Some(value),
        Err(ConfigError::NotFound(_)) => None,
        Err(e) => {
            warn!("ignoring invalid QLIST_{}: {}", key.to_uppercase(), e);
            None
        }
    }
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            extensions: overlay
                .extensions
                .clone()
                .unwrap_or_else(|| self.extensions.clone()),
            max_depth: overlay.max_depth.or(self.max_depth),
            show_types: overlay.show_types.unwrap_or(self.show_types),
            expand: overlay.expand.unwrap_or(self.expand),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; must exist when given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        Self::load_from(global.as_deref(), config_file)
    }

    /// Load settings from explicit layers (global file, then explicit file, then env).
    pub fn load_from(
        global: Option<&Path>,
        config_file: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(path) = global {
            debug!("loading global config {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 3. Explicit config file
        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            debug!("loading config {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables (replace - explicit override)
        Self::apply_env_overrides(current)
    }

    /// Apply QLIST_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("QLIST")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("extensions")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        Ok(settings.overlay(&config))
    }

    /// Fields present in `config` win; malformed ones are skipped with a warning.
    fn overlay(mut self, config: &Config) -> Self {
        if let Some(val) = override_value::<Vec<String>>(config, "extensions") {
            self.extensions = val;
        }
        if let Some(val) = override_value::<usize>(config, "max_depth") {
            self.max_depth = Some(val);
        }
        if let Some(val) = override_value::<bool>(config, "show_types") {
            self.show_types = val;
        }
        if let Some(val) = override_value::<bool>(config, "expand") {
            self.expand = val;
        }
        self
    }

    /// Render as TOML (for `qlist config`).
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {e}"),
        })
    }
}
