//! TOML plugin manifests.
//!
//! A manifest declares entry points the same way a package advertises its
//! plugins:
//!
//! ```toml
//! [[entry_points]]
//! group = "qphase.visualizer"
//! name = "bloch"
//! value = "lab_plugins.bloch:render_bloch"
//! ```

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use qphase_protocols::error::IndexError;
use qphase_protocols::{EntryPoint, PluginIndex};

/// Parsed contents of one manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    #[serde(default)]
    pub entry_points: Vec<EntryPoint>,
}

impl PluginManifest {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[derive(Debug, Clone)]
enum ManifestSource {
    File(PathBuf),
    Inline { name: String, content: String },
}

impl ManifestSource {
    fn name(&self) -> String {
        match self {
            ManifestSource::File(path) => path.display().to_string(),
            ManifestSource::Inline { name, .. } => name.clone(),
        }
    }
}

/// A [`PluginIndex`] backed by a single manifest.
///
/// The manifest is read on every query, so a file fixed between scans is
/// picked up and a broken file fails only the scan that reads it.
#[derive(Debug, Clone)]
pub struct ManifestIndex {
    source: ManifestSource,
}

impl ManifestIndex {
    /// Index backed by a manifest file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: ManifestSource::File(path.into()),
        }
    }

    /// Index backed by manifest text, e.g. embedded in a binary.
    pub fn inline(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: ManifestSource::Inline {
                name: name.into(),
                content: content.into(),
            },
        }
    }

    pub fn name(&self) -> String {
        self.source.name()
    }

    /// Read and parse the manifest.
    pub fn manifest(&self) -> Result<PluginManifest, IndexError> {
        let content = match &self.source {
            ManifestSource::File(path) => {
                fs::read_to_string(path).map_err(|e| IndexError::Manifest {
                    source_name: self.name(),
                    message: e.to_string(),
                })?
            }
            ManifestSource::Inline { content, .. } => content.clone(),
        };

        PluginManifest::parse(&content).map_err(|e| IndexError::Manifest {
            source_name: self.name(),
            message: e.to_string(),
        })
    }
}

impl PluginIndex for ManifestIndex {
    fn entry_points(&self, group: &str) -> Result<Vec<EntryPoint>, IndexError> {
        let manifest = self.manifest()?;
        let entry_points: Vec<EntryPoint> = manifest
            .entry_points
            .into_iter()
            .filter(|ep| ep.group == group)
            .collect();
        debug!(
            "Manifest {} declares {} entry points in group {}",
            self.name(),
            entry_points.len(),
            group
        );
        Ok(entry_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MANIFEST: &str = r#"
        [[entry_points]]
        group = "qphase.visualizer"
        name = "bloch"
        value = "lab_plugins.bloch:render_bloch"

        [[entry_points]]
        group = "qphase.integrator"
        name = "milstein"
        value = "lab_plugins.milstein:Milstein"
    "#;

    #[test]
    fn test_parse_manifest() {
        let manifest = PluginManifest::parse(MANIFEST).unwrap();
        assert_eq!(manifest.entry_points.len(), 2);
        assert_eq!(manifest.entry_points[0].name, "bloch");
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = PluginManifest::parse("").unwrap();
        assert!(manifest.entry_points.is_empty());
    }

    #[test]
    fn test_inline_index_filters_group() {
        let index = ManifestIndex::inline("embedded", MANIFEST);
        let found = index.entry_points("qphase.visualizer").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, "lab_plugins.bloch:render_bloch");
    }

    #[test]
    fn test_file_index() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", MANIFEST).unwrap();

        let index = ManifestIndex::file(file.path());
        assert_eq!(index.entry_points("qphase.integrator").unwrap().len(), 1);
    }

    #[test]
    fn test_missing_file_is_index_error() {
        let index = ManifestIndex::file("/nonexistent/qphase/plugins.toml");
        let err = index.entry_points("qphase.visualizer").unwrap_err();
        assert!(matches!(err, IndexError::Manifest { .. }));
        assert!(err.to_string().contains("/nonexistent/qphase/plugins.toml"));
    }

    #[test]
    fn test_invalid_manifest_is_index_error() {
        let index = ManifestIndex::inline("broken", "[[entry_points]]\nname = 3");
        let err = index.entry_points("qphase.visualizer").unwrap_err();
        assert!(err.to_string().contains("broken"));
    }
}
