//! Dynamic loading boundary.
//!
//! The registry never knows how modules come into existence. A host provides a
//! [`ModuleLoader`] that turns a module path into a [`ModuleHandle`] (running
//! whatever import-time registrations the module performs) and looks up
//! attributes on it.

use std::collections::HashMap;
use std::sync::Arc;

use crate::artifact::Artifact;
use crate::error::{AttributeError, LoadError};
use crate::registrar::Registrar;

/// A loaded module: a named table of attributes.
#[derive(Debug, Clone)]
pub struct ModuleHandle {
    path: String,
    attributes: HashMap<String, Artifact>,
}

impl ModuleHandle {
    /// Create an empty module.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            attributes: HashMap::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Export an attribute, replacing any previous value with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Artifact) {
        self.attributes.insert(name.into(), value);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_attribute(mut self, name: impl Into<String>, value: Artifact) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up an attribute.
    pub fn attribute(&self, name: &str) -> Option<&Artifact> {
        self.attributes.get(name)
    }

    /// Sorted attribute names.
    pub fn attribute_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.attributes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Host-provided dynamic loading capability.
pub trait ModuleLoader: Send + Sync {
    /// Load (or return the already loaded) module at `path`.
    ///
    /// Module initializers may register into `registrar` while loading.
    fn load_module(
        &self,
        path: &str,
        registrar: &dyn Registrar,
    ) -> Result<Arc<ModuleHandle>, LoadError>;

    /// Look up `name` on a loaded module.
    fn get_attribute(&self, module: &ModuleHandle, name: &str) -> Result<Artifact, AttributeError> {
        module
            .attribute(name)
            .cloned()
            .ok_or_else(|| AttributeError::Missing {
                module: module.path().to_string(),
                attribute: name.to_string(),
            })
    }
}
