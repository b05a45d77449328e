//! Tool configuration.
//!
//! Reads an optional `photo-porter.toml` from the config directory (the
//! working directory unless `--config-dir` is given). The file is sparse:
//! user values are merged over stock defaults, so it only needs the keys
//! it wants to change.
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! # default_destination = "/home/me/Sorted"  # move target when none given
//! verify_on_open = true                       # decode a file fully when it is opened
//! history_limit = 100                         # shell history entries kept in memory
//! log_level = "warn"                          # off|error|warn|info|debug|trace
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "photo-porter.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Folder used by `move` when no destination is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_destination: Option<PathBuf>,
    /// Run a full decode when a file is opened in the shell.
    pub verify_on_open: bool,
    /// Maximum number of history entries kept by the shell.
    pub history_limit: usize,
    /// Default log verbosity; `-v` and `RUST_LOG` take precedence.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_destination: None,
            verify_on_open: true,
            history_limit: 100,
            log_level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_limit == 0 {
            return Err(ConfigError::Validation(
                "history_limit must be at least 1".into(),
            ));
        }
        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(ConfigError::Validation(format!(
                "log_level must be one of off, error, warn, info, debug, trace (got {:?})",
                self.log_level
            )));
        }
        if self
            .default_destination
            .as_ref()
            .is_some_and(|d| d.as_os_str().is_empty())
        {
            return Err(ConfigError::Validation(
                "default_destination must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// The configured level, falling back to `Warn` if it does not parse.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Warn)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(AppConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `photo-porter.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `photo-porter.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    let config = resolve_config(base, overlay)?;
    log::debug!("config loaded from {}: {config:?}", dir.display());
    Ok(config)
}

/// Fully commented stock `photo-porter.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# Photo Porter Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# The file is read from the directory given by --config-dir
# (default: the current directory). Unknown keys cause an error.

# Folder that `move` uses when no destination is given on the command line
# or in the shell. Unset by default.
# default_destination = "/home/me/Pictures/Sorted"

# Decode the whole image when a file is opened in the shell, so corrupt
# files are rejected up front. Set to false for a quick extension check.
verify_on_open = true

# Number of operations the shell keeps in its history list.
# Older entries are dropped first. Must be at least 1.
history_limit = 100

# Log verbosity: off, error, warn, info, debug, trace.
# -v raises this to debug; RUST_LOG overrides both.
log_level = "warn"
"##
}
