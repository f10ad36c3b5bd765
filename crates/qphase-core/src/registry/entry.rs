//! Registry entries and their read-only views.

use parking_lot::Mutex;

use qphase_protocols::{Artifact, TargetRef};

/// Where to find an unresolved implementation and how to turn it into an artifact.
#[derive(Debug, Clone)]
pub(crate) struct LazyTarget {
    pub target: TargetRef,
    pub return_callable: bool,
}

#[derive(Debug)]
pub(crate) enum EntryState {
    Unresolved(LazyTarget),
    Resolved(Artifact),
}

/// One `(namespace, key)` entry.
///
/// Each slot carries its own lock so resolving one key never blocks
/// resolution of another.
#[derive(Debug)]
pub(crate) struct EntrySlot {
    pub state: Mutex<EntryState>,
}

impl EntrySlot {
    pub fn new(state: EntryState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// Snapshot the entry state without waiting on an in-flight resolution.
    pub fn status(&self) -> EntryStatus {
        match self.state.try_lock() {
            Some(state) => match &*state {
                EntryState::Resolved(artifact) => EntryStatus::Resolved {
                    type_name: artifact.type_name(),
                },
                EntryState::Unresolved(lazy) => EntryStatus::Unresolved {
                    target: lazy.target.clone(),
                    return_callable: lazy.return_callable,
                },
            },
            None => EntryStatus::Resolving,
        }
    }
}

/// Observable state of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    Resolved { type_name: &'static str },
    Unresolved {
        target: TargetRef,
        return_callable: bool,
    },
    /// Another caller is loading the target right now.
    Resolving,
}

impl EntryStatus {
    pub fn is_resolved(&self) -> bool {
        matches!(self, EntryStatus::Resolved { .. })
    }
}

/// Introspection record for one registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub namespace: String,
    pub key: String,
    pub status: EntryStatus,
}
