//! Folio configuration file handling

use crate::error::ConfigError;
use folio_theme::{FileStorage, MemoryStorage, PreferenceStorage};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file name looked up inside a directory
pub const CONFIG_FILE: &str = "folio.toml";

/// Top-level Folio configuration (folio.toml)
///
/// Every section and field has a default, so an empty or missing file is a
/// valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FolioConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub content: ContentConfig,
}

/// Initial viewport size
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ViewportConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 {
    1280.0
}

fn default_height() -> f32 {
    800.0
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Preference storage location
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Preferences file; the platform config directory when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Keep preferences in memory only
    #[serde(default)]
    pub in_memory: bool,
}

impl StorageConfig {
    /// Preferences file this config points at, if any
    pub fn resolve_path(&self) -> Option<PathBuf> {
        if self.in_memory {
            return None;
        }
        self.path.clone().or_else(FileStorage::default_path)
    }

    /// Open the configured storage
    ///
    /// Falls back to memory storage when no location is available; theme
    /// changes then last for the session only.
    pub fn open(&self) -> Box<dyn PreferenceStorage> {
        match self.resolve_path() {
            Some(path) => Box::new(FileStorage::new(path)),
            None => {
                if !self.in_memory {
                    tracing::warn!("no preferences location available; theme changes will not persist");
                }
                Box::new(MemoryStorage::new())
            }
        }
    }
}

/// Animation timing
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MotionConfig {
    /// Delay between staggered siblings
    #[serde(default = "default_stagger_ms")]
    pub stagger_ms: u32,
    /// Logical milliseconds between frames
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Jump every entrance straight to its end state
    #[serde(default)]
    pub reduced_motion: bool,
    /// Light/dark palette cross-fade
    #[serde(default = "default_theme_transition_ms")]
    pub theme_transition_ms: u32,
    /// Star field seed
    #[serde(default = "default_star_seed")]
    pub star_seed: u64,
}

fn default_stagger_ms() -> u32 {
    200
}

fn default_tick_ms() -> u64 {
    16
}

fn default_theme_transition_ms() -> u32 {
    300
}

fn default_star_seed() -> u64 {
    0x5eed
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            stagger_ms: default_stagger_ms(),
            tick_ms: default_tick_ms(),
            reduced_motion: false,
            theme_transition_ms: default_theme_transition_ms(),
            star_seed: default_star_seed(),
        }
    }
}

/// Contact form submission
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ContactConfig {
    /// Endpoint receiving `{name, email, message}` as JSON; submissions are
    /// only logged when unset
    #[serde(default)]
    pub endpoint: Option<String>,
    /// How long the success notice stays up
    #[serde(default = "default_confirmation_ms")]
    pub confirmation_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_confirmation_ms() -> u64 {
    3000
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            confirmation_ms: default_confirmation_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Page content source
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ContentConfig {
    /// TOML or JSON content file; built-in sample content when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl FolioConfig {
    /// Load configuration from a directory (looks for folio.toml) or a file
    ///
    /// A missing file yields the defaults.
    pub fn load_from_dir(path: &Path) -> Result<Self, ConfigError> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(CONFIG_FILE)
        };

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Io {
            path: config_path.clone(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: config_path.clone(),
                source,
            },
            other => other,
        })?;
        tracing::debug!(path = %config_path.display(), "config loaded");
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FolioConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(ConfigError::Invalid {
                field: "viewport",
                reason: format!(
                    "size must be positive, got {}x{}",
                    self.viewport.width, self.viewport.height
                ),
            });
        }
        if self.motion.tick_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "motion.tick_ms",
                reason: "must be > 0".to_string(),
            });
        }
        Ok(())
    }
}
