//! Registry errors surfaced to callers of register and resolve.

use thiserror::Error;

use super::{ResolutionError, TargetParseError};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("No entry registered for {namespace}:{key}")]
    NotFound { namespace: String, key: String },

    #[error("Entry already registered: {namespace}:{key}")]
    AlreadyRegistered { namespace: String, key: String },

    #[error("Namespace must not be empty")]
    EmptyNamespace,

    #[error("Key must not be empty (namespace {namespace})")]
    EmptyKey { namespace: String },

    #[error("Invalid target: {0}")]
    InvalidTarget(#[from] TargetParseError),

    #[error("Failed to resolve {namespace}:{key}: {source}")]
    Resolution {
        namespace: String,
        key: String,
        source: ResolutionError,
    },

    #[error("Entry {namespace}:{key} holds {found}, expected {expected}")]
    TypeMismatch {
        namespace: String,
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl RegistryError {
    /// Returns true for a missing `(namespace, key)` entry.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound { .. })
    }

    /// Returns true for a failed lazy resolution (retryable).
    pub fn is_resolution(&self) -> bool {
        matches!(self, RegistryError::Resolution { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use std::error::Error as _;

    #[test]
    fn test_not_found_error() {
        let err = RegistryError::NotFound {
            namespace: "visualizer".to_string(),
            key: "bloch".to_string(),
        };
        assert!(err.is_not_found());
        assert!(err.to_string().contains("visualizer:bloch"));
    }

    #[test]
    fn test_already_registered_error() {
        let err = RegistryError::AlreadyRegistered {
            namespace: "visualizer".to_string(),
            key: "psd".to_string(),
        };
        assert!(err.to_string().contains("already registered"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_resolution_error_keeps_source() {
        let err = RegistryError::Resolution {
            namespace: "visualizer".to_string(),
            key: "psd".to_string(),
            source: LoadError::ModuleNotFound("pkg.psd".to_string()).into(),
        };
        assert!(err.is_resolution());
        assert!(err.to_string().contains("pkg.psd"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_invalid_target_from_parse_error() {
        let err = RegistryError::from(TargetParseError::MissingSeparator("x".to_string()));
        assert!(err.to_string().contains("Invalid target"));
    }

    #[test]
    fn test_error_debug() {
        let err = RegistryError::EmptyNamespace;
        assert!(format!("{:?}", err).contains("EmptyNamespace"));
    }
}
