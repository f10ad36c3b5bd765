//! # QPhase Core
//!
//! Namespaced, lazily-resolved capability registry.
//!
//! ## Components
//!
//! - [`Registry`] - Central registry mapping `(namespace, key)` to resolved
//!   artifacts or unresolved target references
//! - [`Namespaced`] - Registration functions pre-bound to one namespace
//! - [`StaticLoader`] - Module loader backed by a static table of module definitions,
//!   including [`LinkedModule`]s submitted by linked crates
//! - [`Discovery`] - Best-effort plugin discovery from entry points or module paths
//!
//! ## Lifecycle
//!
//! A registry is created once with [`create_registry`] (or [`Registry::new`]) and
//! passed by reference to every call site. Lazy entries are loaded on their
//! first successful [`Registry::resolve`] and cached for the registry's lifetime.

pub mod discovery;
pub mod index;
pub mod loader;
pub mod registry;

pub use discovery::{Discovery, DiscoveryReport, PluginOutcome, PluginSource};
pub use index::StaticIndex;
pub use loader::{LinkedInit, LinkedModule, StaticLoader};
pub use registry::{
    DuplicatePolicy, EntryInfo, EntryStatus, Namespaced, Registry, create_registry,
};
