//! Plugin declaration index.

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, TargetParseError};
use crate::target::TargetRef;

/// One declared plugin: `name = "module.path:attribute"` under a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPoint {
    pub group: String,
    pub name: String,
    /// Raw `module:attribute` value, parsed on demand.
    pub value: String,
}

impl EntryPoint {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parse the declared value as a target reference.
    pub fn target(&self) -> Result<TargetRef, TargetParseError> {
        self.value.parse()
    }
}

/// An external, host-owned table of plugin declarations, queried by group.
pub trait PluginIndex: Send + Sync {
    fn entry_points(&self, group: &str) -> Result<Vec<EntryPoint>, IndexError>;
}
