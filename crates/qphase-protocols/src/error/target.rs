//! Target reference parsing errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetParseError {
    #[error("Target '{0}' is missing the ':' separator")]
    MissingSeparator(String),

    #[error("Target '{0}' has an empty module path")]
    EmptyModule(String),

    #[error("Target '{0}' has an empty attribute name")]
    EmptyAttribute(String),

    #[error("Invalid module path: {0}")]
    InvalidModulePath(String),

    #[error("Invalid attribute name: {0}")]
    InvalidAttribute(String),
}
