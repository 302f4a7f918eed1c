//! Configuration file handling.
//!
//! The file is optional. Lookup order: `--config PATH`, then
//! `<config_dir>/pylonmap/config.toml` when it exists, then built-in defaults.
//! Every section and field may be omitted.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use pylonmap_core::{ConversionOptions, SchemaNames};
use serde::{Deserialize, Serialize};

/// Main pylonmap configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PylonmapConfig {
    /// Pipeline switches; command-line flags override them
    #[serde(default)]
    pub conversion: ConversionOptions,
    /// Element names of the export format
    #[serde(default)]
    pub schema: SchemaNames,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    /// Parsed level, `None` when the configured text is not a level name.
    pub fn tracing_level(&self) -> Option<tracing::Level> {
        self.level.parse().ok()
    }
}

/// A configuration together with the file it came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: PylonmapConfig,
    /// `None` when built-in defaults are in effect
    pub source: Option<PathBuf>,
}

/// Default location: `<config_dir>/pylonmap/config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| anyhow!("no configuration directory available"))?;
    Ok(base.join("pylonmap").join("config.toml"))
}

/// Load an explicit config file, or the default one when present.
///
/// An explicitly named file must exist; a missing default file is not an error.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Ok(path) if path.exists() => path,
            _ => return Ok(LoadedConfig::default()),
        },
    };

    let config = read_config(&path)?;
    Ok(LoadedConfig {
        config,
        source: Some(path),
    })
}

pub fn read_config(path: &Path) -> Result<PylonmapConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("parsing config file {}", path.display()))
}

pub fn save_config(config: &PylonmapConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating config directory {}", parent.display()))?;
    }
    let contents = render_config(config)?;
    fs::write(path, contents).with_context(|| format!("writing config file {}", path.display()))?;
    Ok(())
}

pub fn render_config(config: &PylonmapConfig) -> Result<String> {
    toml::to_string_pretty(config).context("serializing configuration to TOML")
}
