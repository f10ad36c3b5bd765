//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Entry-point group scanned for visualizer plugins when none is configured.
pub const DEFAULT_ENTRY_POINT_GROUP: &str = "qphase.visualizer";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub plugins: PluginsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// `<config_dir>/qphase/qphase.toml`, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("qphase").join("qphase.toml"))
    }
}

/// Central registry configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub duplicates: DuplicateMode,
}

/// How the registry treats a second registration of the same key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateMode {
    #[default]
    Reject,
    Overwrite,
}

/// Plugin discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginsConfig {
    /// Register the built-in renderers.
    #[serde(default = "default_true")]
    pub builtins: bool,

    #[serde(default = "default_entry_point_group")]
    pub entry_point_group: String,

    /// Plugin manifest files declaring entry points.
    #[serde(default)]
    pub manifests: Vec<String>,

    /// Module paths loaded for their import-time registrations.
    #[serde(default)]
    pub modules: Vec<String>,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            builtins: default_true(),
            entry_point_group: default_entry_point_group(),
            manifests: Vec::new(),
            modules: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_entry_point_group() -> String {
    DEFAULT_ENTRY_POINT_GROUP.to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}
