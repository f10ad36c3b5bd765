//! Static module table loader.
//!
//! Stands in for runtime symbol loading: each module path maps to an
//! initializer that exports attributes and may register into the registry,
//! the way an imported module runs its top-level code.
//!
//! Crates linked into the final binary contribute modules with
//! [`inventory::submit!`]:
//!
//! ```ignore
//! inventory::submit! {
//!     qphase_core::LinkedModule::new("lab_plugins.bloch", init_bloch)
//! }
//! ```

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, warn};

use qphase_protocols::error::{LoadError, RegistryError};
use qphase_protocols::{Artifact, ModuleHandle, ModuleLoader, Registrar, TargetRef};

type Initializer = dyn Fn(&mut ModuleHandle, &dyn Registrar) -> Result<(), String> + Send + Sync;

/// Initializer of a module linked in at build time.
pub type LinkedInit = fn(&mut ModuleHandle, &dyn Registrar) -> Result<(), String>;

/// A module definition submitted by a linked crate.
pub struct LinkedModule {
    pub path: &'static str,
    pub init: LinkedInit,
}

impl LinkedModule {
    pub const fn new(path: &'static str, init: LinkedInit) -> Self {
        Self { path, init }
    }
}

inventory::collect!(LinkedModule);

struct ModuleDefinition {
    init: Arc<Initializer>,
    loaded: Mutex<Option<Arc<ModuleHandle>>>,
}

enum Staged {
    Artifact {
        namespace: String,
        key: String,
        artifact: Artifact,
    },
    Lazy {
        namespace: String,
        key: String,
        target: TargetRef,
        return_callable: bool,
    },
}

/// Holds an initializer's registrations until it returns.
///
/// Only a successful initializer's registrations reach the registry, so a
/// failed load leaves nothing behind and can be retried.
#[derive(Default)]
struct StagedRegistrar {
    staged: Mutex<Vec<Staged>>,
}

impl StagedRegistrar {
    fn check(namespace: &str, key: &str) -> Result<(), RegistryError> {
        if namespace.is_empty() {
            return Err(RegistryError::EmptyNamespace);
        }
        if key.is_empty() {
            return Err(RegistryError::EmptyKey {
                namespace: namespace.to_string(),
            });
        }
        Ok(())
    }

    /// Apply the staged registrations in order. A rejected registration is
    /// logged and does not undo the others.
    fn commit(self, registrar: &dyn Registrar, module: &str) {
        for staged in self.staged.into_inner() {
            let (namespace, key, result) = match staged {
                Staged::Artifact {
                    namespace,
                    key,
                    artifact,
                } => {
                    let result = registrar.register(&namespace, &key, artifact);
                    (namespace, key, result)
                }
                Staged::Lazy {
                    namespace,
                    key,
                    target,
                    return_callable,
                } => {
                    let result = registrar.register_lazy(&namespace, &key, target, return_callable);
                    (namespace, key, result)
                }
            };
            if let Err(e) = result {
                warn!(
                    "Module {} could not register {}:{}: {}",
                    module, namespace, key, e
                );
            }
        }
    }
}

impl Registrar for StagedRegistrar {
    fn register(&self, namespace: &str, key: &str, artifact: Artifact) -> Result<(), RegistryError> {
        Self::check(namespace, key)?;
        self.staged.lock().push(Staged::Artifact {
            namespace: namespace.to_string(),
            key: key.to_string(),
            artifact,
        });
        Ok(())
    }

    fn register_lazy(
        &self,
        namespace: &str,
        key: &str,
        target: TargetRef,
        return_callable: bool,
    ) -> Result<(), RegistryError> {
        Self::check(namespace, key)?;
        self.staged.lock().push(Staged::Lazy {
            namespace: namespace.to_string(),
            key: key.to_string(),
            target,
            return_callable,
        });
        Ok(())
    }
}

/// Module loader backed by an in-process table of module definitions.
///
/// Loads are cached per path: an initializer runs at most once after it
/// succeeds. A failed initializer is not cached, so the next load retries.
/// Defining a path again replaces the module and drops its cached load.
///
/// Registrations an initializer makes are applied after it returns `Ok`
/// and discarded when it fails. Duplicates rejected by the registry at
/// that point are logged; the load itself still succeeds.
#[derive(Default)]
pub struct StaticLoader {
    modules: DashMap<String, Arc<ModuleDefinition>>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// A loader with every [`LinkedModule`] defined.
    pub fn linked() -> Self {
        let loader = Self::new();
        loader.define_linked();
        loader
    }

    /// Define every [`LinkedModule`] submitted by crates linked into the
    /// binary. Returns how many were defined.
    pub fn define_linked(&self) -> usize {
        let mut count = 0;
        for linked in inventory::iter::<LinkedModule> {
            self.define(linked.path, linked.init);
            count += 1;
        }
        debug!("Defined {} linked modules", count);
        count
    }

    /// Define (or redefine) the module at `path`. Its initializer does not run
    /// until the module is first loaded.
    pub fn define<F>(&self, path: impl Into<String>, init: F)
    where
        F: Fn(&mut ModuleHandle, &dyn Registrar) -> Result<(), String> + Send + Sync + 'static,
    {
        let path = path.into();
        debug!("Defined module {}", path);
        self.modules.insert(
            path,
            Arc::new(ModuleDefinition {
                init: Arc::new(init),
                loaded: Mutex::new(None),
            }),
        );
    }

    /// Builder-style [`define`](Self::define).
    pub fn with_module<F>(self, path: impl Into<String>, init: F) -> Self
    where
        F: Fn(&mut ModuleHandle, &dyn Registrar) -> Result<(), String> + Send + Sync + 'static,
    {
        self.define(path, init);
        self
    }

    /// Remove a module definition. Returns true if it existed.
    pub fn undefine(&self, path: &str) -> bool {
        self.modules.remove(path).is_some()
    }

    pub fn is_defined(&self, path: &str) -> bool {
        self.modules.contains_key(path)
    }

    /// Check whether the module has been loaded successfully.
    pub fn is_loaded(&self, path: &str) -> bool {
        self.definition(path)
            .map(|module| module.loaded.lock().is_some())
            .unwrap_or(false)
    }

    /// Sorted paths of all defined modules.
    pub fn module_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.modules.iter().map(|m| m.key().clone()).collect();
        paths.sort();
        paths
    }

    /// Clone the definition out so no map lock is held while it is used.
    fn definition(&self, path: &str) -> Option<Arc<ModuleDefinition>> {
        self.modules.get(path).map(|module| module.value().clone())
    }
}

impl ModuleLoader for StaticLoader {
    fn load_module(
        &self,
        path: &str,
        registrar: &dyn Registrar,
    ) -> Result<Arc<ModuleHandle>, LoadError> {
        let definition = self
            .definition(path)
            .ok_or_else(|| LoadError::ModuleNotFound(path.to_string()))?;

        let mut loaded = definition.loaded.lock();
        if let Some(module) = loaded.as_ref() {
            return Ok(module.clone());
        }

        let mut module = ModuleHandle::new(path);
        let staged = StagedRegistrar::default();
        (definition.init)(&mut module, &staged as &dyn Registrar).map_err(|message| LoadError::InitFailed {
            module: path.to_string(),
            message,
        })?;
        staged.commit(registrar, path);

        let module = Arc::new(module);
        *loaded = Some(module.clone());
        debug!("Loaded module {}", path);
        Ok(module)
    }
}

impl std::fmt::Debug for StaticLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticLoader")
            .field("modules", &self.module_paths())
            .finish()
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
