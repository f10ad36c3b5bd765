//! Write access to a registry.

use crate::artifact::Artifact;
use crate::error::RegistryError;
use crate::target::TargetRef;

/// Registration operations, handed to module initializers during a load so
/// that plugins can register themselves without holding the registry type.
pub trait Registrar: Send + Sync {
    /// Store a resolved artifact under `(namespace, key)`.
    fn register(&self, namespace: &str, key: &str, artifact: Artifact) -> Result<(), RegistryError>;

    /// Store an unresolved target under `(namespace, key)`. Nothing is loaded.
    fn register_lazy(
        &self,
        namespace: &str,
        key: &str,
        target: TargetRef,
        return_callable: bool,
    ) -> Result<(), RegistryError>;
}
