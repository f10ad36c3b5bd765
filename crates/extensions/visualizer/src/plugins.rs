//! Third-party renderer discovery.
//!
//! Both functions are best-effort: a broken plugin is recorded in the
//! returned report and skipped, never propagated.

use qphase_core::{Discovery, DiscoveryReport, Registry};
use qphase_protocols::PluginIndex;

use crate::NAMESPACE;

/// Lazily register every renderer declared under `group` in `index`.
pub fn register_entry_points(
    registry: &Registry,
    index: &dyn PluginIndex,
    group: &str,
) -> DiscoveryReport {
    Discovery::new(registry, NAMESPACE).register_entry_points(index, group)
}

/// Load plugin modules that register renderers when they are loaded.
pub fn register_from_paths<I, S>(registry: &Registry, paths: I) -> DiscoveryReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Discovery::new(registry, NAMESPACE).register_from_paths(paths)
}
