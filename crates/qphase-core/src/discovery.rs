//! Best-effort plugin discovery.
//!
//! Plugins come from two places: entry points declared in a [`PluginIndex`]
//! and module paths loaded for their import-time registrations. A broken
//! plugin never stops the scan; every plugin gets an outcome in the
//! returned [`DiscoveryReport`] and failures are logged.

use std::fmt;

use tracing::{info, warn};

use qphase_protocols::PluginIndex;
use qphase_protocols::error::DiscoveryError;

use crate::registry::Registry;

/// Where a discovered plugin came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginSource {
    /// The whole entry-point group (used when the index query itself fails).
    Group(String),
    /// One declared entry point.
    EntryPoint { name: String, value: String },
    /// A module loaded by path.
    Module(String),
}

impl fmt::Display for PluginSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginSource::Group(group) => write!(f, "group {}", group),
            PluginSource::EntryPoint { name, value } => write!(f, "{} = {}", name, value),
            PluginSource::Module(path) => write!(f, "module {}", path),
        }
    }
}

/// Result of discovering a single plugin.
#[derive(Debug)]
pub struct PluginOutcome {
    pub source: PluginSource,
    pub result: Result<(), DiscoveryError>,
}

impl PluginOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-plugin outcomes of a discovery scan.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    pub outcomes: Vec<PluginOutcome>,
}

impl DiscoveryReport {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, source: PluginSource, result: Result<(), DiscoveryError>) {
        if let Err(e) = &result {
            warn!("Skipping plugin {}: {}", source, e);
        }
        self.outcomes.push(PluginOutcome { source, result });
    }

    /// Append another report's outcomes.
    pub fn merge(&mut self, other: DiscoveryReport) {
        self.outcomes.extend(other.outcomes);
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &PluginOutcome> {
        self.outcomes.iter().filter(|o| o.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &PluginOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }

    /// True when no plugin failed.
    pub fn is_clean(&self) -> bool {
        self.failed().next().is_none()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Discovery driver bound to one registry namespace.
#[derive(Debug)]
pub struct Discovery<'r> {
    registry: &'r Registry,
    namespace: String,
}

impl<'r> Discovery<'r> {
    pub fn new(registry: &'r Registry, namespace: impl Into<String>) -> Self {
        Self {
            registry,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Lazily register every entry point declared under `group`.
    ///
    /// Each entry point's name becomes the key and its value the target,
    /// registered with `return_callable = true`. Nothing is loaded.
    pub fn register_entry_points(&self, index: &dyn PluginIndex, group: &str) -> DiscoveryReport {
        let mut report = DiscoveryReport::new();

        let entry_points = match index.entry_points(group) {
            Ok(entry_points) => entry_points,
            Err(e) => {
                report.record(PluginSource::Group(group.to_string()), Err(e.into()));
                return report;
            }
        };

        let binder = self.registry.namespaced(self.namespace.as_str());
        for ep in entry_points {
            let result = ep
                .target()
                .map_err(|source| DiscoveryError::MalformedEntryPoint {
                    name: ep.name.clone(),
                    source,
                })
                .and_then(|target| {
                    binder
                        .register_lazy(&ep.name, target, true)
                        .map_err(DiscoveryError::from)
                });
            report.record(
                PluginSource::EntryPoint {
                    name: ep.name,
                    value: ep.value,
                },
                result,
            );
        }

        info!(
            "Discovered {} of {} entry points in group {}",
            report.succeeded().count(),
            report.len(),
            group
        );
        report
    }

    /// Load each module for its import-time registrations.
    pub fn register_from_paths<I, S>(&self, paths: I) -> DiscoveryReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = DiscoveryReport::new();

        for path in paths {
            let path = path.as_ref();
            let result = self
                .registry
                .load_module(path)
                .map(|_| ())
                .map_err(DiscoveryError::from);
            report.record(PluginSource::Module(path.to_string()), result);
        }

        info!(
            "Loaded {} of {} plugin modules for namespace {}",
            report.succeeded().count(),
            report.len(),
            self.namespace
        );
        report
    }
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
