//! Registry assembly from configuration.

use std::sync::Arc;

use tracing::{debug, info, warn};

use qphase_config::{
    Config, ConfigError, ConfigLoader, ConfigValidator, DuplicateMode, ManifestIndex,
};
use qphase_core::{DiscoveryReport, DuplicatePolicy, Registry};
use qphase_visualizer::{builtin_loader, plugins, register_builtins};

fn duplicate_policy(mode: DuplicateMode) -> DuplicatePolicy {
    match mode {
        DuplicateMode::Reject => DuplicatePolicy::Reject,
        DuplicateMode::Overwrite => DuplicatePolicy::Overwrite,
    }
}

/// Reject invalid configuration; log warnings.
pub(crate) fn validate(config: &Config) -> Result<(), ConfigError> {
    let result = ConfigValidator::validate(config);
    for warning in &result.warnings {
        warn!("{}: {}", warning.path, warning.message);
    }
    match result.errors.into_iter().next() {
        Some(error) => Err(ConfigError::InvalidValue {
            field: error.path,
            message: error.message,
        }),
        None => Ok(()),
    }
}

/// Create the registry with built-ins registered, without running discovery.
///
/// The loader knows the built-in plotter modules and every module linked
/// crates submitted as a [`qphase_core::LinkedModule`].
pub(crate) fn create(config: &Config) -> anyhow::Result<Registry> {
    let loader = builtin_loader();
    let linked = loader.define_linked();
    debug!("{} plugin modules linked in", linked);

    let registry = Registry::with_policy(
        Arc::new(loader),
        duplicate_policy(config.registry.duplicates),
    );

    if config.plugins.builtins {
        register_builtins(&registry)?;
    }

    Ok(registry)
}

/// Discover configured plugins into `registry`.
pub(crate) fn discover(registry: &Registry, config: &Config) -> DiscoveryReport {
    let group = config.plugins.entry_point_group.as_str();
    let mut report = DiscoveryReport::new();

    for path in ConfigLoader::manifest_paths(config) {
        let index = ManifestIndex::file(path);
        report.merge(plugins::register_entry_points(registry, &index, group));
    }
    report.merge(plugins::register_from_paths(
        registry,
        &config.plugins.modules,
    ));

    info!(
        "Discovery finished: {} succeeded, {} failed",
        report.succeeded().count(),
        report.failed().count()
    );
    report
}

/// Validate `config`, create the registry and run discovery.
pub(crate) fn build(config: &Config) -> anyhow::Result<(Registry, DiscoveryReport)> {
    validate(config)?;
    let registry = create(config)?;
    let report = discover(&registry, config);
    Ok((registry, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qphase_core::LinkedModule;
    use qphase_protocols::{Artifact, ModuleHandle, Registrar, TargetRef};
    use qphase_visualizer::{Figure, NAMESPACE, RenderRequest, Renderer, render};
    use std::io::Write;

    fn init_bloch(module: &mut ModuleHandle, _registrar: &dyn Registrar) -> Result<(), String> {
        let renderer = Renderer::new(|request| {
            Ok(Figure {
                kind: "bloch".to_string(),
                title: request.title.clone().unwrap_or_default(),
                x_label: String::new(),
                y_label: String::new(),
                series: Vec::new(),
            })
        });
        module.insert("render_bloch", Artifact::new(renderer));
        Ok(())
    }

    fn init_wigner(_module: &mut ModuleHandle, registrar: &dyn Registrar) -> Result<(), String> {
        let target =
            TargetRef::new("lab_plugins.bloch", "render_bloch").map_err(|e| e.to_string())?;
        registrar
            .register_lazy(NAMESPACE, "wigner", target, true)
            .map_err(|e| e.to_string())
    }

    inventory::submit! {
        LinkedModule::new("lab_plugins.bloch", init_bloch)
    }

    inventory::submit! {
        LinkedModule::new("lab_plugins.wigner", init_wigner)
    }

    fn manifest(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_default_config_registers_builtins() {
        let (registry, report) = build(&Config::default()).unwrap();
        assert!(report.is_empty());
        assert_eq!(registry.keys(NAMESPACE), vec!["phase_portrait", "psd"]);
        assert_eq!(registry.policy(), DuplicatePolicy::Reject);
    }

    #[test]
    fn test_builtins_disabled() {
        let mut config = Config::default();
        config.plugins.builtins = false;

        let (registry, _) = build(&config).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_overwrite_mode() {
        let mut config = Config::default();
        config.registry.duplicates = DuplicateMode::Overwrite;

        let registry = create(&config).unwrap();
        assert_eq!(registry.policy(), DuplicatePolicy::Overwrite);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = Config::default();
        config.plugins.modules = vec!["not a/module".to_string()];

        let err = validate(&config).unwrap_err();
        match err {
            ConfigError::InvalidValue { field, .. } => assert_eq!(field, "plugins.modules[0]"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_manifest_entry_points_discovered() {
        let file = manifest(
            r#"
            [[entry_points]]
            group = "qphase.visualizer"
            name = "psd_alias"
            value = "qphase.visualizer.plotters.psd:render_psd"
            "#,
        );

        let mut config = Config::default();
        config.plugins.manifests = vec![file.path().display().to_string()];
        config.plugins.modules = vec!["lab_plugins.absent".to_string()];

        let (registry, report) = build(&config).unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report.failed().count(), 1);
        assert!(registry.contains(NAMESPACE, "psd_alias"));
        assert_eq!(registry.is_resolved(NAMESPACE, "psd_alias"), Some(false));
    }

    #[test]
    fn test_manifest_plugin_resolves_through_linked_module() {
        let file = manifest(
            r#"
            [[entry_points]]
            group = "qphase.visualizer"
            name = "bloch"
            value = "lab_plugins.bloch:render_bloch"
            "#,
        );
        let mut config = Config::default();
        config.plugins.manifests = vec![file.path().display().to_string()];

        let (registry, report) = build(&config).unwrap();
        assert!(report.is_clean());
        assert_eq!(registry.is_resolved(NAMESPACE, "bloch"), Some(false));

        let request = RenderRequest::new(vec![vec![[0.0, 1.0]]], 1.0).with_title("spin");
        let figure = render(&registry, "bloch", &request).unwrap();
        assert_eq!(figure.kind, "bloch");
        assert_eq!(figure.title, "spin");
    }

    #[test]
    fn test_configured_module_registers_on_load() {
        let mut config = Config::default();
        config.plugins.modules = vec!["lab_plugins.wigner".to_string()];

        let (registry, report) = build(&config).unwrap();
        assert!(report.is_clean());
        assert!(registry.contains(NAMESPACE, "wigner"));
        assert_eq!(
            render(&registry, "wigner", &RenderRequest::new(vec![vec![[1.0, 0.0]]], 1.0))
                .unwrap()
                .kind,
            "bloch"
        );
    }
}
