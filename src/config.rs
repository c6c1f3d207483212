//! Lab configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. User values are
//! merged on top of stock defaults, so a config file only needs the keys it
//! wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! wiki_root = "static/wiki"    # Documentation tree (one subdirectory per category)
//! catalog = "catalog.toml"     # Catalog snapshot
//! cache_dir = "cached_files"   # Per-user uploaded files and cached print configs
//! output_dir = "dist"          # Where rendered pages are written
//!
//! [i18n]
//! default_language = "en"      # Language used when --lang is not given
//! not_available = "not available"  # Placeholder text for undocumented options
//! ```
//!
//! Relative paths are resolved against the directory holding `config.toml`.
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Lab configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabConfig {
    /// Root of the documentation tree.
    pub wiki_root: String,
    /// Catalog snapshot file.
    pub catalog: String,
    /// Per-user upload directories and the cached print configs.
    pub cache_dir: String,
    /// Output directory for rendered pages.
    pub output_dir: String,
    /// Language settings.
    pub i18n: I18nConfig,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            wiki_root: "static/wiki".to_string(),
            catalog: "catalog.toml".to_string(),
            cache_dir: "cached_files".to_string(),
            output_dir: "dist".to_string(),
            i18n: I18nConfig::default(),
        }
    }
}

/// Language settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct I18nConfig {
    /// Language used when none is requested explicitly.
    pub default_language: String,
    /// Message shown (in italics) for options without documentation.
    pub not_available: String,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_language: "en".to_string(),
            not_available: "not available".to_string(),
        }
    }
}

/// Filesystem locations with relative config values resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct LabPaths {
    pub wiki_root: PathBuf,
    pub catalog: PathBuf,
    pub cache_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl LabConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.i18n.default_language.trim().is_empty() {
            return Err(ConfigError::Validation(
                "i18n.default_language must not be empty".into(),
            ));
        }
        if self.i18n.not_available.trim().is_empty() {
            return Err(ConfigError::Validation(
                "i18n.not_available must not be empty".into(),
            ));
        }
        for (key, value) in [
            ("wiki_root", &self.wiki_root),
            ("catalog", &self.catalog),
            ("cache_dir", &self.cache_dir),
            ("output_dir", &self.output_dir),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }

    /// Resolve configured paths against `base` (absolute paths are kept).
    pub fn paths(&self, base: &Path) -> LabPaths {
        LabPaths {
            wiki_root: base.join(&self.wiki_root),
            catalog: base.join(&self.catalog),
            cache_dir: base.join(&self.cache_dir),
            output_dir: base.join(&self.output_dir),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(LabConfig::default()).expect("default config must serialize")
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

/// Merge an optional overlay onto the defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<LabConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: LabConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a `config.toml` file.
///
/// A missing file yields the stock defaults; an invalid one is an error.
pub fn load_config(config_path: &Path) -> Result<LabConfig, ConfigError> {
    if !config_path.exists() {
        return resolve_config(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# plastic-lab configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Relative paths are resolved against
# the directory containing this file. Unknown keys will cause an error.

# Documentation tree. Expected subdirectories:
#   production-methods/  material-types/  colors/
# holding <name>.md (English) or <name>_<lang>.md (translations).
wiki_root = "static/wiki"

# Catalog snapshot: production methods, material types, colors,
# materials and stock.
catalog = "catalog.toml"

# Uploaded files live in <cache_dir>/<user>/; cached print
# configurations are kept in <cache_dir>/.print-configs.json.
cache_dir = "cached_files"

# Where `plastic-lab wiki` and `plastic-lab ticket` write pages.
output_dir = "dist"

# ---------------------------------------------------------------------------
# Languages
# ---------------------------------------------------------------------------
[i18n]
# Used when no --lang flag is given. Missing translations fall back to English.
default_language = "en"

# Shown in italics for catalog entries that have no documentation.
not_available = "not available"
"##
}
