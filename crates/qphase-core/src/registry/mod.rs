//! Central registry and namespace binder.

mod central;
mod entry;
mod namespaced;

pub use central::{DuplicatePolicy, Registry, create_registry};
pub use entry::{EntryInfo, EntryStatus};
pub use namespaced::Namespaced;
