//! Visualizer renderers for QPhase.
//!
//! Registry keys:
//! `visualizer:phase_portrait` | `visualizer:psd`
//!
//! # Features
//!
//! - **Lazy built-ins**: [`register_builtins`] registers the built-in renderers by
//!   target reference; the plotter modules are only loaded on first resolve
//! - **Plugin discovery**: [`plugins::register_entry_points`] and
//!   [`plugins::register_from_paths`] add third-party renderers
//! - **Rendering**: [`render`] resolves a renderer by key and runs it

mod builtins;
mod error;
pub mod plotters;
pub mod plugins;
mod render;

pub use builtins::{builtin_loader, define_builtin_modules, register_builtins};
pub use error::{RenderError, VisualizerError};
pub use render::{Figure, RenderRequest, Renderer, Series, render};

/// Registry namespace for all visualizer renderers.
pub const NAMESPACE: &str = "visualizer";

/// Entry-point group scanned for third-party renderers.
pub const DEFAULT_ENTRY_POINT_GROUP: &str = "qphase.visualizer";
