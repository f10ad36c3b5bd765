//! Visualizer errors.

use thiserror::Error;

use qphase_protocols::error::RegistryError;

/// Failure inside a renderer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("No samples to render")]
    EmptyInput,

    #[error("Sample interval must be positive and finite, got {0}")]
    InvalidSampleInterval(f64),

    #[error("Mode {index} out of range ({available} modes available)")]
    UnknownMode { index: usize, available: usize },

    #[error("Modes have different lengths")]
    RaggedModes,

    #[error("Invalid option {option}: {message}")]
    InvalidOption { option: String, message: String },
}

/// Failure to look up or run a renderer.
#[derive(Debug, Error)]
pub enum VisualizerError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
