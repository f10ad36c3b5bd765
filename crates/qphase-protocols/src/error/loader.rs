//! Module loading and lazy resolution errors.

use thiserror::Error;

/// Failure to load a module.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Module {module} failed to initialize: {message}")]
    InitFailed { module: String, message: String },
}

/// Failure to look up an attribute on a loaded module.
#[derive(Debug, Clone, Error)]
pub enum AttributeError {
    #[error("Module {module} has no attribute {attribute}")]
    Missing { module: String, attribute: String },
}

/// Failure to turn a lazy target into an artifact.
#[derive(Debug, Clone, Error)]
pub enum ResolutionError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Attribute(#[from] AttributeError),

    #[error("Target {target} is not callable")]
    NotCallable { target: String },

    #[error("Invoking {target} failed: {message}")]
    Invocation { target: String, message: String },
}
