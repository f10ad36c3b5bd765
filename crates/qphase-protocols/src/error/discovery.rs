//! Plugin index and discovery errors.
//!
//! These never escape a discovery scan; they are recorded per plugin in the
//! discovery report.

use thiserror::Error;

use super::{LoadError, RegistryError, TargetParseError};

/// Failure to query a plugin declaration index.
#[derive(Debug, Clone, Error)]
pub enum IndexError {
    #[error("Plugin index unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid plugin manifest {source_name}: {message}")]
    Manifest { source_name: String, message: String },
}

/// Failure recorded for a single discovered plugin.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("Malformed entry point {name}: {source}")]
    MalformedEntryPoint {
        name: String,
        source: TargetParseError,
    },

    #[error(transparent)]
    Registration(#[from] RegistryError),

    #[error(transparent)]
    Load(#[from] LoadError),
}
