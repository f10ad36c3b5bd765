//! The central registry.

use std::any::{Any, type_name};
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info, warn};

use qphase_protocols::error::{LoadError, RegistryError, ResolutionError};
use qphase_protocols::{Artifact, ModuleHandle, ModuleLoader, Registrar, TargetRef};

use super::entry::{EntryInfo, EntrySlot, EntryState, LazyTarget};
use super::namespaced::Namespaced;

type EntryKey = (String, String);

/// What happens when a `(namespace, key)` pair is registered twice.
///
/// The policy is fixed when the registry is created and applies to every
/// registration path: direct calls, namespace binders, module initializers
/// and plugin discovery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep the first entry and fail the later registration.
    #[default]
    Reject,
    /// Replace the existing entry (last writer wins).
    Overwrite,
}

/// Process-lifetime registry of named capabilities.
///
/// Entries are either resolved artifacts or unresolved [`TargetRef`]s that
/// are loaded through the injected [`ModuleLoader`] the first time they are
/// resolved. Resolution is memoized; a failed resolution is not, so the next
/// call retries.
pub struct Registry {
    entries: DashMap<EntryKey, Arc<EntrySlot>>,
    loader: Arc<dyn ModuleLoader>,
    policy: DuplicatePolicy,
}

/// Create a registry with the default duplicate policy.
pub fn create_registry(loader: Arc<dyn ModuleLoader>) -> Registry {
    Registry::new(loader)
}

impl Registry {
    /// Create a registry that rejects duplicate registrations.
    pub fn new(loader: Arc<dyn ModuleLoader>) -> Self {
        Self::with_policy(loader, DuplicatePolicy::default())
    }

    /// Create a registry with an explicit duplicate policy.
    pub fn with_policy(loader: Arc<dyn ModuleLoader>, policy: DuplicatePolicy) -> Self {
        Self {
            entries: DashMap::new(),
            loader,
            policy,
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Store an artifact as a resolved entry.
    pub fn register(
        &self,
        namespace: &str,
        key: &str,
        artifact: Artifact,
    ) -> Result<(), RegistryError> {
        self.insert(namespace, key, EntryState::Resolved(artifact))?;
        debug!("Registered {}:{}", namespace, key);
        Ok(())
    }

    /// Store an unresolved target. Nothing is loaded until the first resolve.
    ///
    /// With `return_callable` the target attribute itself becomes the
    /// artifact; otherwise the attribute must be a [`Factory`] and its return
    /// value becomes the artifact.
    ///
    /// [`Factory`]: qphase_protocols::Factory
    pub fn register_lazy(
        &self,
        namespace: &str,
        key: &str,
        target: TargetRef,
        return_callable: bool,
    ) -> Result<(), RegistryError> {
        let description = target.to_string();
        self.insert(
            namespace,
            key,
            EntryState::Unresolved(LazyTarget {
                target,
                return_callable,
            }),
        )?;
        debug!("Registered {}:{} -> {} (lazy)", namespace, key, description);
        Ok(())
    }

    /// Parse `target` as `module:attribute` and register it lazily.
    pub fn register_lazy_str(
        &self,
        namespace: &str,
        key: &str,
        target: &str,
        return_callable: bool,
    ) -> Result<(), RegistryError> {
        let target: TargetRef = target.parse()?;
        self.register_lazy(namespace, key, target, return_callable)
    }

    /// Registration functions bound to `namespace`.
    pub fn namespaced(&self, namespace: impl Into<String>) -> Namespaced<'_> {
        Namespaced::new(self, namespace)
    }

    /// Look up an entry, loading and caching it on first access.
    pub fn resolve(&self, namespace: &str, key: &str) -> Result<Artifact, RegistryError> {
        let slot = self
            .slot(namespace, key)
            .ok_or_else(|| RegistryError::NotFound {
                namespace: namespace.to_string(),
                key: key.to_string(),
            })?;

        // Held across the load so concurrent resolvers of this key wait for
        // one result instead of loading again.
        let mut state = slot.state.lock();
        let lazy = match &*state {
            EntryState::Resolved(artifact) => return Ok(artifact.clone()),
            EntryState::Unresolved(lazy) => lazy.clone(),
        };

        let artifact = self.load_target(&lazy).map_err(|source| {
            warn!(
                "Failed to resolve {}:{} from {}: {}",
                namespace, key, lazy.target, source
            );
            RegistryError::Resolution {
                namespace: namespace.to_string(),
                key: key.to_string(),
                source,
            }
        })?;

        *state = EntryState::Resolved(artifact.clone());
        info!("Resolved {}:{} from {}", namespace, key, lazy.target);
        Ok(artifact)
    }

    /// Resolve and downcast to `T`.
    pub fn resolve_as<T: Any + Send + Sync>(
        &self,
        namespace: &str,
        key: &str,
    ) -> Result<Arc<T>, RegistryError> {
        let artifact = self.resolve(namespace, key)?;
        artifact
            .downcast::<T>()
            .ok_or_else(|| RegistryError::TypeMismatch {
                namespace: namespace.to_string(),
                key: key.to_string(),
                expected: type_name::<T>(),
                found: artifact.type_name(),
            })
    }

    /// Load a module through the registry's loader, with this registry as
    /// the target of its import-time registrations.
    pub fn load_module(&self, path: &str) -> Result<Arc<ModuleHandle>, LoadError> {
        self.loader.load_module(path, self)
    }

    /// Check whether `(namespace, key)` is registered.
    pub fn contains(&self, namespace: &str, key: &str) -> bool {
        self.entries
            .contains_key(&(namespace.to_string(), key.to_string()))
    }

    /// `Some(true)` once the entry has been resolved, `None` if it is absent.
    pub fn is_resolved(&self, namespace: &str, key: &str) -> Option<bool> {
        self.slot(namespace, key)
            .map(|slot| slot.status().is_resolved())
    }

    /// Sorted keys registered under `namespace`.
    pub fn keys(&self, namespace: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.key().0 == namespace)
            .map(|entry| entry.key().1.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Sorted, de-duplicated namespaces.
    pub fn namespaces(&self) -> Vec<String> {
        let mut namespaces: Vec<String> = self
            .entries
            .iter()
            .map(|entry| entry.key().0.clone())
            .collect();
        namespaces.sort();
        namespaces.dedup();
        namespaces
    }

    /// Snapshot of every entry, sorted by namespace then key.
    pub fn entries(&self) -> Vec<EntryInfo> {
        let slots: Vec<(EntryKey, Arc<EntrySlot>)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let mut infos: Vec<EntryInfo> = slots
            .into_iter()
            .map(|((namespace, key), slot)| EntryInfo {
                namespace,
                key,
                status: slot.status(),
            })
            .collect();
        infos.sort_by(|a, b| (&a.namespace, &a.key).cmp(&(&b.namespace, &b.key)));
        infos
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clone the slot out so no map lock is held while it is used.
    fn slot(&self, namespace: &str, key: &str) -> Option<Arc<EntrySlot>> {
        self.entries
            .get(&(namespace.to_string(), key.to_string()))
            .map(|entry| entry.value().clone())
    }

    fn insert(&self, namespace: &str, key: &str, state: EntryState) -> Result<(), RegistryError> {
        if namespace.is_empty() {
            return Err(RegistryError::EmptyNamespace);
        }
        if key.is_empty() {
            return Err(RegistryError::EmptyKey {
                namespace: namespace.to_string(),
            });
        }

        let slot = Arc::new(EntrySlot::new(state));
        match self.entries.entry((namespace.to_string(), key.to_string())) {
            Entry::Occupied(mut occupied) => match self.policy {
                DuplicatePolicy::Reject => Err(RegistryError::AlreadyRegistered {
                    namespace: namespace.to_string(),
                    key: key.to_string(),
                }),
                DuplicatePolicy::Overwrite => {
                    warn!("Overwriting registry entry {}:{}", namespace, key);
                    occupied.insert(slot);
                    Ok(())
                }
            },
            Entry::Vacant(vacant) => {
                vacant.insert(slot);
                Ok(())
            }
        }
    }

    fn load_target(&self, lazy: &LazyTarget) -> Result<Artifact, ResolutionError> {
        let module = self.load_module(lazy.target.module_path())?;
        let attribute = self
            .loader
            .get_attribute(&module, lazy.target.attribute())?;

        if lazy.return_callable {
            return Ok(attribute);
        }

        let factory = attribute
            .as_factory()
            .ok_or_else(|| ResolutionError::NotCallable {
                target: lazy.target.to_string(),
            })?;
        factory
            .invoke()
            .map_err(|message| ResolutionError::Invocation {
                target: lazy.target.to_string(),
                message,
            })
    }
}

impl Registrar for Registry {
    fn register(&self, namespace: &str, key: &str, artifact: Artifact) -> Result<(), RegistryError> {
        Registry::register(self, namespace, key, artifact)
    }

    fn register_lazy(
        &self,
        namespace: &str,
        key: &str,
        target: TargetRef,
        return_callable: bool,
    ) -> Result<(), RegistryError> {
        Registry::register_lazy(self, namespace, key, target, return_callable)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &self.entries.len())
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
#[path = "central_tests.rs"]
mod tests;
