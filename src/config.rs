//! Configuration file support
//!
//! Settings are read from TOML and merged with command-line overrides; the
//! command line always wins.
//!
//! Search order when no path is given:
//! 1. `./canonical-pages.toml`
//! 2. `<config dir>/canonical-pages/config.toml`
//!
//! ```toml
//! [output]
//! format = "json"
//!
//! [rules]
//! auto_join = false
//! store_path = "rules.json"
//!
//! [logging]
//! level = "debug"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Local config file name
pub const CONFIG_FILE_NAME: &str = "canonical-pages.toml";

/// Default rule store file name
pub const DEFAULT_STORE_FILE: &str = "canonical-rules.json";

/// Config loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ============================================================
// File Sections
// ============================================================

/// How results are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Join contiguous continuous rules after each change
    pub auto_join: bool,
    /// Rule store location
    pub store_path: Option<PathBuf>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            auto_join: true,
            store_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `"info"` or `"canonical_pages=debug"`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Contents of a config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub rules: RulesConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load the first config file found, or defaults
    pub fn load() -> Result<Self, ConfigError> {
        match Self::search_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load_from_path(path),
            None => Ok(Self::default()),
        }
    }

    /// Load a specific config file
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Candidate config file locations, highest priority first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("canonical-pages").join("config.toml"));
        }
        paths
    }

    /// Apply command-line overrides on top of the file values
    pub fn merge_with_cli(&self, cli: &CliOverrides) -> Settings {
        Settings {
            format: cli.format.unwrap_or(self.output.format),
            auto_join: cli.auto_join.unwrap_or(self.rules.auto_join),
            store_path: cli
                .store_path
                .clone()
                .or_else(|| self.rules.store_path.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE)),
            log_level: cli
                .log_level
                .clone()
                .unwrap_or_else(|| self.logging.level.clone()),
        }
    }
}

// ============================================================
// Overrides and Effective Settings
// ============================================================

/// Values explicitly set on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub format: Option<OutputFormat>,
    pub auto_join: Option<bool>,
    pub store_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Effective settings after merging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub format: OutputFormat,
    pub auto_join: bool,
    pub store_path: PathBuf,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Config::default().merge_with_cli(&CliOverrides::default())
    }
}
