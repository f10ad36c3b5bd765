//! In-memory plugin declaration index.

use qphase_protocols::error::IndexError;
use qphase_protocols::{EntryPoint, PluginIndex};

/// A fixed list of entry points, for embedders that know their plugins at
/// build time and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIndex {
    entry_points: Vec<EntryPoint>,
}

impl StaticIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry_point(
        mut self,
        group: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.entry_points.push(EntryPoint::new(group, name, value));
        self
    }

    pub fn push(&mut self, entry_point: EntryPoint) {
        self.entry_points.push(entry_point);
    }
}

impl PluginIndex for StaticIndex {
    fn entry_points(&self, group: &str) -> Result<Vec<EntryPoint>, IndexError> {
        Ok(self
            .entry_points
            .iter()
            .filter(|ep| ep.group == group)
            .cloned()
            .collect())
    }
}
