//! Type-erased artifacts stored in the registry.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

/// A resolved registry value.
///
/// Artifacts are cheap to clone: every clone shares the same allocation, so
/// identity can be checked with [`Artifact::ptr_eq`]. Typed access goes
/// through [`Artifact::downcast`] or [`Artifact::downcast_ref`].
#[derive(Clone)]
pub struct Artifact {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Artifact {
    /// Wrap a value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wrap an already shared value without reallocating.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            type_name: type_name::<T>(),
        }
    }

    /// Wrap a closure as an invocable [`Factory`] artifact.
    pub fn factory<F>(f: F) -> Self
    where
        F: Fn() -> Result<Artifact, String> + Send + Sync + 'static,
    {
        Self::new(Factory::new(f))
    }

    /// Get a shared handle to the value if it has type `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.inner.clone().downcast::<T>().ok()
    }

    /// Borrow the value if it has type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Check whether the value has type `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrow the value as a factory, if it is one.
    pub fn as_factory(&self) -> Option<&Factory> {
        self.downcast_ref::<Factory>()
    }

    /// Name of the wrapped type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns true if both artifacts share the same allocation.
    pub fn ptr_eq(&self, other: &Artifact) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("type", &self.type_name)
            .finish()
    }
}

type FactoryFn = dyn Fn() -> Result<Artifact, String> + Send + Sync;

/// An attribute that produces its artifact when invoked with no arguments.
#[derive(Clone)]
pub struct Factory(Arc<FactoryFn>);

impl Factory {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Result<Artifact, String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the factory.
    pub fn invoke(&self) -> Result<Artifact, String> {
        (self.0)()
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Factory")
    }
}
