//! Registration functions pre-bound to a namespace.

use qphase_protocols::error::RegistryError;
use qphase_protocols::{Artifact, Registrar, TargetRef};

/// A namespace fixed over any [`Registrar`].
///
/// Pure partial application: every call forwards to the registrar with the
/// bound namespace, so registrations made through a binder are
/// indistinguishable from direct calls.
#[derive(Clone)]
pub struct Namespaced<'r> {
    registrar: &'r dyn Registrar,
    namespace: String,
}

impl<'r> Namespaced<'r> {
    /// Bind `namespace` over `registrar`.
    pub fn new(registrar: &'r dyn Registrar, namespace: impl Into<String>) -> Self {
        Self {
            registrar,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn register(&self, key: &str, artifact: Artifact) -> Result<(), RegistryError> {
        self.registrar.register(&self.namespace, key, artifact)
    }

    pub fn register_lazy(
        &self,
        key: &str,
        target: TargetRef,
        return_callable: bool,
    ) -> Result<(), RegistryError> {
        self.registrar
            .register_lazy(&self.namespace, key, target, return_callable)
    }

    /// Parse `target` as `module:attribute` and register it lazily.
    pub fn register_lazy_str(
        &self,
        key: &str,
        target: &str,
        return_callable: bool,
    ) -> Result<(), RegistryError> {
        let target: TargetRef = target.parse()?;
        self.register_lazy(key, target, return_callable)
    }

    /// Split into the bound `(register, register_lazy)` pair.
    #[allow(clippy::type_complexity)]
    pub fn split(
        self,
    ) -> (
        impl Fn(&str, Artifact) -> Result<(), RegistryError> + 'r,
        impl Fn(&str, TargetRef, bool) -> Result<(), RegistryError> + 'r,
    ) {
        let Namespaced {
            registrar,
            namespace,
        } = self;
        let lazy_namespace = namespace.clone();

        let register = move |key: &str, artifact: Artifact| {
            registrar.register(&namespace, key, artifact)
        };
        let register_lazy = move |key: &str, target: TargetRef, return_callable: bool| {
            registrar.register_lazy(&lazy_namespace, key, target, return_callable)
        };
        (register, register_lazy)
    }
}

impl std::fmt::Debug for Namespaced<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namespaced")
            .field("namespace", &self.namespace)
            .finish()
    }
}
