//! Runtime configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Path given as the first command line argument
//! 2. Environment variable: `KITBAG_CONFIG=/path/to/kitbag.toml`
//! 3. `kitbag.toml` in the working directory
//! 4. Built-in defaults (default layout and the demo items)
//!
//! An explicitly named file that cannot be read is an error; a missing
//! `kitbag.toml` is not.
//!
//! # Example Config File
//!
//! ```toml
//! log_level = "debug"
//!
//! [layout]
//! hotkeys = 10
//! rows = 4
//! columns = 6
//! equipment = ["head", "top", "top", "bottom", "bottom"]
//!
//! [[items]]
//! name = "potion"
//! type = "active"
//! max_stack = 5
//! ```
//!
//! Omitting `items` keeps the demo items.

use crate::catalog::ItemSpec;
use kitbag_inventory::{InventoryLayout, LayoutError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "KITBAG_CONFIG";

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "kitbag.toml";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),
    #[error("item '{0}' is defined more than once")]
    DuplicateItem(String),
    #[error("item '{name}': {reason}")]
    InvalidItem { name: String, reason: &'static str },
}

/// Complete runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KitbagConfig {
    /// Default log filter; `RUST_LOG` takes precedence
    pub log_level: String,
    /// Slot layout
    pub layout: InventoryLayout,
    /// Item definitions
    pub items: Vec<ItemSpec>,
    /// File the config was loaded from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for KitbagConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            layout: InventoryLayout::default(),
            items: ItemSpec::demo_items(),
            config_path: None,
        }
    }
}

impl KitbagConfig {
    /// Load configuration from the first source that applies
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return Self::load_from_file(path);
            }
        }

        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::load_from_file(DEFAULT_CONFIG_FILE);
        }

        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check layout and item definitions
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;

        let mut names = HashSet::new();
        for item in &self.items {
            let invalid = |reason| ConfigError::InvalidItem {
                name: item.name.clone(),
                reason,
            };

            if item.name.trim().is_empty() {
                return Err(invalid("name is empty"));
            }
            if !names.insert(item.name.as_str()) {
                return Err(ConfigError::DuplicateItem(item.name.clone()));
            }
            if item.max_stack == 0 {
                return Err(invalid("max_stack must be at least 1"));
            }
            if !item.cooldown.is_finite() || item.cooldown < 0.0 {
                return Err(invalid("cooldown must be a non-negative number of seconds"));
            }
            if let Some(repeat) = item.repeat {
                if !repeat.is_finite() || repeat <= 0.0 {
                    return Err(invalid("repeat must be a positive number of seconds"));
                }
            }
        }
        Ok(())
    }

    /// One line per setting, for the startup log
    pub fn summary(&self) -> Vec<String> {
        vec![
            format!(
                "Config: {}",
                self.config_path
                    .as_ref()
                    .map_or_else(|| "built-in defaults".to_string(), |p| p.display().to_string())
            ),
            format!(
                "Layout: {} hotkeys, {}x{} grid, {} equipment slots",
                self.layout.hotkeys,
                self.layout.rows,
                self.layout.columns,
                self.layout.equipment.len()
            ),
            format!("Items: {} definitions", self.items.len()),
        ]
    }
}
