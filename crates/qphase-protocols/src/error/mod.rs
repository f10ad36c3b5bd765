//! Error types for the QPhase protocol layer.

mod discovery;
mod loader;
mod registry;
mod target;

pub use discovery::*;
pub use loader::*;
pub use registry::*;
pub use target::*;
