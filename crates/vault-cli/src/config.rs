//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use vault_domain::filter::DEFAULT_PAGE_SIZE;
use vault_sdk::{Theme, ThemeSource};
use vault_store::StoreConfig;

/// Name of the per-user directory under the home directory
const APP_DIR: &str = ".evidence-vault";

/// Name of the vault directory under the platform data directory
const DATA_DIR_NAME: &str = "evidence-vault";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Vault data directory; defaults to the platform data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Store tuning
    #[serde(default)]
    pub store: StoreConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Rows per page for `list`
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Theme preference
    #[serde(default)]
    pub theme: ThemeSetting,

    /// Command history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

/// Configured theme: fixed, or taken from the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeSetting {
    /// Inspect `COLORFGBG`
    #[default]
    System,
    /// Always light
    Light,
    /// Always dark
    Dark,
}

impl ThemeSource for ThemeSetting {
    fn preference(&self) -> Theme {
        match self {
            ThemeSetting::Light => Theme::Light,
            ThemeSetting::Dark => Theme::Dark,
            ThemeSetting::System => theme_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref()),
        }
    }
}

/// Interpret a `COLORFGBG` value (`"fg;bg"` or `"fg;other;bg"`)
///
/// Background colors 0-6 and 8 are dark; anything else, or no value, is light.
pub fn theme_from_colorfgbg(value: Option<&str>) -> Theme {
    let background = value
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok());

    match background {
        Some(0..=6) | Some(8) => Theme::Dark,
        _ => Theme::Light,
    }
}

impl Config {
    /// Directory holding the config file, history and default data.
    pub fn app_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(APP_DIR))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::app_dir()?.join("config.toml"))
    }

    /// Load configuration from the default path or create default.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Data directory: explicit override, then config, then the platform
    /// data directory (`~/.local/share/evidence-vault` on Linux).
    pub fn resolve_data_dir(&self, override_dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = override_dir.or(self.data_dir.as_deref()) {
            return Ok(dir.to_path_buf());
        }
        match dirs::data_dir() {
            Some(dir) => Ok(dir.join(DATA_DIR_NAME)),
            None => Self::app_dir(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            page_size: DEFAULT_PAGE_SIZE,
            theme: ThemeSetting::System,
            history_size: 1000,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_history_size() -> usize {
    1000
}
