//! # QPhase Protocols
//!
//! Shared types and traits for the QPhase capability registry.
//! Contains only interface definitions - the registry itself lives in `qphase-core`.
//!
//! ## Core Types
//!
//! - [`Artifact`] - Type-erased, shareable value stored in the registry
//! - [`Factory`] - Invocable attribute producing an artifact on demand
//! - [`TargetRef`] - `module:attribute` descriptor of a lazily loaded implementation
//!
//! ## Core Traits
//!
//! - [`ModuleLoader`] - Host-provided dynamic loading capability
//! - [`Registrar`] - Write access to a registry, handed to module initializers
//! - [`PluginIndex`] - External table of plugin entry-point declarations

pub mod artifact;
pub mod error;
pub mod loader;
pub mod plugin;
pub mod registrar;
pub mod target;

pub use artifact::{Artifact, Factory};
pub use error::{
    AttributeError, DiscoveryError, IndexError, LoadError, RegistryError, ResolutionError,
    TargetParseError,
};
pub use loader::{ModuleHandle, ModuleLoader};
pub use plugin::{EntryPoint, PluginIndex};
pub use registrar::Registrar;
pub use target::TargetRef;
