/// Settings loading and resolution
///
/// Priority order, highest first:
/// 1. Command-line flag
/// 2. Environment variable (handled by clap's `env` support)
/// 3. TOML config file
/// 4. Compiled default
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::classify::client::DEFAULT_TIMEOUT;
use crate::error::ConfigError;
use crate::intake::preview::DEFAULT_PREVIEW_SIZE;
use crate::state::data::ModelId;

/// Provider address used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";

/// Accepted preview sizes (longest side, pixels)
const PREVIEW_SIZE_RANGE: std::ops::RangeInclusive<u32> = 16..=4096;

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Base URL of the classification provider
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Model selected when the window opens
    pub default_model: ModelId,
    /// Longest side of image previews in pixels
    pub preview_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            default_model: ModelId::default(),
            preview_size: DEFAULT_PREVIEW_SIZE,
        }
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub model: Option<ModelId>,
}

impl Settings {
    /// Location of the per-user config file
    ///
    /// - Linux: ~/.config/leaf-classifier/config.toml
    /// - macOS: ~/Library/Application Support/leaf-classifier/config.toml
    /// - Windows: %APPDATA%\leaf-classifier\config.toml
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("leaf-classifier").join("config.toml"))
    }

    /// Parse settings from TOML; absent keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load the config file
    ///
    /// An explicitly given file must exist. The default location is optional
    /// and falls back to compiled defaults when missing.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    info!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let settings = Self::from_toml_str(&content)?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Apply command-line and environment values on top of the file
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(endpoint) = &overrides.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(model) = overrides.model {
            self.default_model = model;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "endpoint must start with http:// or https:// (got '{}')",
                self.endpoint
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be greater than 0".to_string()));
        }
        if !PREVIEW_SIZE_RANGE.contains(&self.preview_size) {
            return Err(ConfigError::Invalid(format!(
                "preview_size must be between {} and {} (got {})",
                PREVIEW_SIZE_RANGE.start(),
                PREVIEW_SIZE_RANGE.end(),
                self.preview_size
            )));
        }
        Ok(())
    }

    /// Load, override and validate in one step
    pub fn resolve(explicit: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        let settings = Self::load(explicit)?.with_overrides(overrides);
        settings.validate()?;
        Ok(settings)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
