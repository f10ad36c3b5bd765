//! # QPhase Config
//!
//! Configuration management and plugin manifests for QPhase.

mod error;
mod loader;
mod manifest;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use manifest::{ManifestIndex, PluginManifest};
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
