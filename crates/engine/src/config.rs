//! Loader configuration via `bundle.toml`
//!
//! A missing file or missing field falls back to defaults.

use docbundle_core::{BundleError, BundleResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "bundle.toml";

/// Bundle loading configuration loaded from `bundle.toml`.
///
/// # Example
///
/// ```toml
/// skip_loaded_bundles = true
/// report_initial_progress = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Skip a bundle when the store already holds the same bundle at an
    /// equal or newer create time.
    #[serde(default = "default_true")]
    pub skip_loaded_bundles: bool,
    /// Emit a zero progress snapshot before the first element.
    #[serde(default = "default_true")]
    pub report_initial_progress: bool,
}

fn default_true() -> bool {
    true
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            skip_loaded_bundles: true,
            report_initial_progress: true,
        }
    }
}

impl BundleConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Bundle loader configuration
#
# Skip bundles already loaded at the same or a newer create time (default: true)
skip_loaded_bundles = true

# Emit a zero progress snapshot before the first element (default: true)
report_initial_progress = true
"#
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the string is not valid config.
    pub fn from_toml(content: &str) -> BundleResult<Self> {
        toml::from_str(content)
            .map_err(|e| BundleError::invalid_input(format!("Failed to parse config: {}", e)))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> BundleResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BundleError::internal(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            BundleError::invalid_input(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> BundleResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                BundleError::internal(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> BundleResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| BundleError::internal(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            BundleError::internal(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
