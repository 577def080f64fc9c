//! Configuration loading.
//!
//! Handles loading, validating, and merging `variant-compare.toml`. Stock
//! defaults are serialized to a TOML table, the user file is merged on top,
//! and the result is deserialized and validated. A missing file means stock
//! defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [upload]
//! max_bytes = 10485760      # Largest accepted upload (10 MiB)
//! decode_timeout_ms = 5000  # Give up decoding after this long
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "variant-compare.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompareConfig {
    /// Upload limits.
    pub upload: UploadConfig,
}

/// Limits applied by the extractor to every upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadConfig {
    /// Largest accepted payload in bytes.
    pub max_bytes: u64,
    /// Decode time bound in milliseconds.
    pub decode_timeout_ms: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            decode_timeout_ms: 5000,
        }
    }
}

impl UploadConfig {
    pub fn decode_timeout(&self) -> Duration {
        Duration::from_millis(self.decode_timeout_ms)
    }
}

impl CompareConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upload.max_bytes == 0 {
            return Err(ConfigError::Validation(
                "upload.max_bytes must be greater than 0".into(),
            ));
        }
        if self.upload.decode_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "upload.decode_timeout_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(CompareConfig::default())?)
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

/// Read a config file as a raw TOML value. `Ok(None)` if it does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<CompareConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CompareConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a file path, falling back to defaults when absent.
pub fn load_config(path: &Path) -> Result<CompareConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    resolve_config(overlay)
}

/// Returns a fully-commented stock config file.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# variant-compare configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Upload limits
# ---------------------------------------------------------------------------
[upload]
# Largest accepted upload in bytes. Larger files are rejected before decoding.
max_bytes = 10485760

# How long to wait for an image to decode, in milliseconds. A decode that
# takes longer is reported as a decode error.
decode_timeout_ms = 5000
"##
}
