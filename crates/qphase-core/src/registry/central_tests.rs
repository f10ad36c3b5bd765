use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::loader::StaticLoader;
use crate::registry::EntryStatus;
use qphase_protocols::Factory;

/// A loader with one module whose import counts itself.
fn counted_loader(path: &'static str) -> (Arc<StaticLoader>, Arc<AtomicUsize>) {
    let imports = Arc::new(AtomicUsize::new(0));
    let counter = imports.clone();
    let loader = StaticLoader::new().with_module(path, move |module, _registrar| {
        counter.fetch_add(1, Ordering::SeqCst);
        module.insert("render", Artifact::new(String::from("renderer")));
        module.insert(
            "make_settings",
            Artifact::factory(|| Ok(Artifact::new(vec![1u32, 2, 3]))),
        );
        module.insert("CONSTANT", Artifact::new(3.5f64));
        module.insert(
            "explode",
            Artifact::factory(|| Err("division by zero".to_string())),
        );
        Ok(())
    });
    (Arc::new(loader), imports)
}

fn target(raw: &str) -> TargetRef {
    raw.parse().unwrap()
}

#[test]
fn test_register_then_resolve() {
    let registry = Registry::new(Arc::new(StaticLoader::new()));
    let artifact = Artifact::new(42u64);

    registry
        .register("visualizer", "answer", artifact.clone())
        .unwrap();

    let resolved = registry.resolve("visualizer", "answer").unwrap();
    assert!(resolved.ptr_eq(&artifact));
    assert_eq!(registry.is_resolved("visualizer", "answer"), Some(true));
}

#[test]
fn test_resolve_not_found() {
    let registry = Registry::new(Arc::new(StaticLoader::new()));

    let err = registry.resolve("visualizer", "missing").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(registry.is_resolved("visualizer", "missing"), None);
}

#[test]
fn test_lazy_registration_does_not_load() {
    let (loader, imports) = counted_loader("pkg.plotters");
    let registry = Registry::new(loader.clone());

    registry
        .register_lazy("visualizer", "render", target("pkg.plotters:render"), true)
        .unwrap();

    assert_eq!(imports.load(Ordering::SeqCst), 0);
    assert!(!loader.is_loaded("pkg.plotters"));
    assert_eq!(registry.is_resolved("visualizer", "render"), Some(false));
}

#[test]
fn test_lazy_return_callable_is_memoized() {
    let (loader, imports) = counted_loader("pkg.plotters");
    let registry = Registry::new(loader);
    registry
        .register_lazy("visualizer", "render", target("pkg.plotters:render"), true)
        .unwrap();

    let first = registry.resolve("visualizer", "render").unwrap();
    let second = registry.resolve("visualizer", "render").unwrap();

    assert_eq!(first.downcast_ref::<String>().unwrap(), "renderer");
    assert!(first.ptr_eq(&second));
    assert_eq!(imports.load(Ordering::SeqCst), 1);
}

#[test]
fn test_lazy_return_callable_keeps_factory_uninvoked() {
    let (loader, _) = counted_loader("pkg.plotters");
    let registry = Registry::new(loader);
    registry
        .register_lazy(
            "visualizer",
            "settings_factory",
            target("pkg.plotters:make_settings"),
            true,
        )
        .unwrap();

    let artifact = registry.resolve("visualizer", "settings_factory").unwrap();
    assert!(artifact.is::<Factory>());
}

#[test]
fn test_lazy_invoke_once_and_cache() {
    let (loader, _) = counted_loader("pkg.plotters");
    let registry = Registry::new(loader.clone());
    registry
        .register_lazy(
            "visualizer",
            "settings",
            target("pkg.plotters:make_settings"),
            false,
        )
        .unwrap();

    let first = registry.resolve_as::<Vec<u32>>("visualizer", "settings").unwrap();
    assert_eq!(*first, vec![1, 2, 3]);

    // Replacing the module afterwards must not change the cached artifact.
    loader.define("pkg.plotters", |module, _registrar| {
        module.insert(
            "make_settings",
            Artifact::factory(|| Ok(Artifact::new(vec![9u32]))),
        );
        Ok(())
    });

    let second = registry.resolve_as::<Vec<u32>>("visualizer", "settings").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(*second, vec![1, 2, 3]);
}

#[test]
fn test_lazy_not_callable() {
    let (loader, _) = counted_loader("pkg.plotters");
    let registry = Registry::new(loader);
    registry
        .register_lazy("visualizer", "constant", target("pkg.plotters:CONSTANT"), false)
        .unwrap();

    let err = registry.resolve("visualizer", "constant").unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Resolution {
            source: ResolutionError::NotCallable { .. },
            ..
        }
    ));
}

#[test]
fn test_lazy_invocation_failure() {
    let (loader, _) = counted_loader("pkg.plotters");
    let registry = Registry::new(loader);
    registry
        .register_lazy("visualizer", "explode", target("pkg.plotters:explode"), false)
        .unwrap();

    let err = registry.resolve("visualizer", "explode").unwrap_err();
    assert!(err.to_string().contains("division by zero"));
    assert_eq!(registry.is_resolved("visualizer", "explode"), Some(false));
}

#[test]
fn test_missing_attribute() {
    let (loader, _) = counted_loader("pkg.plotters");
    let registry = Registry::new(loader);
    registry
        .register_lazy("visualizer", "nope", target("pkg.plotters:nope"), true)
        .unwrap();

    let err = registry.resolve("visualizer", "nope").unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Resolution {
            source: ResolutionError::Attribute(_),
            ..
        }
    ));
}

#[test]
fn test_missing_module_then_retry() {
    let loader = Arc::new(StaticLoader::new());
    let registry = Registry::new(loader.clone());
    registry
        .register_lazy("visualizer", "late", target("pkg.late:render"), true)
        .unwrap();

    let err = registry.resolve("visualizer", "late").unwrap_err();
    assert!(err.is_resolution());
    assert!(matches!(
        err,
        RegistryError::Resolution {
            source: ResolutionError::Load(LoadError::ModuleNotFound(_)),
            ..
        }
    ));
    assert_eq!(registry.is_resolved("visualizer", "late"), Some(false));

    loader.define("pkg.late", |module, _registrar| {
        module.insert("render", Artifact::new("late renderer"));
        Ok(())
    });

    let artifact = registry.resolve("visualizer", "late").unwrap();
    assert_eq!(*artifact.downcast_ref::<&str>().unwrap(), "late renderer");
    assert_eq!(registry.is_resolved("visualizer", "late"), Some(true));
}

#[test]
fn test_resolve_as_type_mismatch() {
    let registry = Registry::new(Arc::new(StaticLoader::new()));
    registry
        .register("visualizer", "answer", Artifact::new(42u64))
        .unwrap();

    let err = registry.resolve_as::<String>("visualizer", "answer").unwrap_err();
    assert!(matches!(err, RegistryError::TypeMismatch { found: "u64", .. }));
}

#[test]
fn test_reject_duplicates_by_default() {
    let registry = Registry::new(Arc::new(StaticLoader::new()));
    assert_eq!(registry.policy(), DuplicatePolicy::Reject);
    let first = Artifact::new(1u8);

    registry.register("visualizer", "psd", first.clone()).unwrap();
    let err = registry
        .register_lazy("visualizer", "psd", target("other.psd:render"), true)
        .unwrap_err();

    assert!(matches!(err, RegistryError::AlreadyRegistered { .. }));
    assert!(registry.resolve("visualizer", "psd").unwrap().ptr_eq(&first));
}

#[test]
fn test_overwrite_policy_last_writer_wins() {
    let registry = Registry::with_policy(Arc::new(StaticLoader::new()), DuplicatePolicy::Overwrite);
    let second = Artifact::new(2u8);

    registry.register("visualizer", "psd", Artifact::new(1u8)).unwrap();
    registry.register("visualizer", "psd", second.clone()).unwrap();

    assert_eq!(registry.len(), 1);
    assert!(registry.resolve("visualizer", "psd").unwrap().ptr_eq(&second));
}

#[test]
fn test_empty_namespace_and_key() {
    let registry = Registry::new(Arc::new(StaticLoader::new()));

    assert!(matches!(
        registry.register("", "key", Artifact::new(())),
        Err(RegistryError::EmptyNamespace)
    ));
    assert!(matches!(
        registry.register("visualizer", "", Artifact::new(())),
        Err(RegistryError::EmptyKey { .. })
    ));
    assert!(registry.is_empty());
}

#[test]
fn test_same_key_in_different_namespaces() {
    let registry = Registry::new(Arc::new(StaticLoader::new()));
    registry.register("visualizer", "default", Artifact::new(1u8)).unwrap();
    registry.register("integrator", "default", Artifact::new(2u8)).unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.namespaces(), vec!["integrator", "visualizer"]);
    assert_eq!(*registry.resolve_as::<u8>("integrator", "default").unwrap(), 2);
}

#[test]
fn test_register_lazy_str() {
    let registry = Registry::new(Arc::new(StaticLoader::new()));

    registry
        .register_lazy_str("visualizer", "psd", "pkg.psd:render_psd", true)
        .unwrap();
    assert!(matches!(
        registry.register_lazy_str("visualizer", "bad", "pkg.psd", true),
        Err(RegistryError::InvalidTarget(_))
    ));
    assert_eq!(registry.keys("visualizer"), vec!["psd"]);
}

#[test]
fn test_entries_snapshot() {
    let (loader, _) = counted_loader("pkg.plotters");
    let registry = Registry::new(loader);
    registry
        .register_lazy("visualizer", "render", target("pkg.plotters:render"), true)
        .unwrap();
    registry.register("visualizer", "answer", Artifact::new(1u8)).unwrap();

    let entries = registry.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].key, "answer");
    assert_eq!(entries[0].status, EntryStatus::Resolved { type_name: "u8" });
    assert_eq!(
        entries[1].status,
        EntryStatus::Unresolved {
            target: target("pkg.plotters:render"),
            return_callable: true,
        }
    );
}

#[test]
fn test_module_side_effect_registration_during_resolve() {
    let loader = StaticLoader::new().with_module("pkg.bundle", |module, registrar| {
        module.insert("primary", Artifact::new("primary"));
        registrar
            .register("visualizer", "secondary", Artifact::new("secondary"))
            .map_err(|e| e.to_string())
    });
    let registry = Registry::new(Arc::new(loader));
    registry
        .register_lazy("visualizer", "primary", target("pkg.bundle:primary"), true)
        .unwrap();

    registry.resolve("visualizer", "primary").unwrap();
    assert!(registry.contains("visualizer", "secondary"));
}

#[test]
fn test_failed_init_with_side_registration_can_retry() {
    let loader = Arc::new(StaticLoader::new());
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    loader.define("pkg.flaky", move |module, registrar| {
        registrar
            .register("visualizer", "side", Artifact::new("side"))
            .map_err(|e| e.to_string())?;
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err("dependency missing".to_string());
        }
        module.insert("render", Artifact::new("flaky renderer"));
        Ok(())
    });
    let registry = Registry::new(loader);
    registry
        .register_lazy("visualizer", "flaky", target("pkg.flaky:render"), true)
        .unwrap();

    assert!(registry.resolve("visualizer", "flaky").is_err());
    assert!(!registry.contains("visualizer", "side"));

    let artifact = registry.resolve("visualizer", "flaky").unwrap();
    assert_eq!(*artifact.downcast_ref::<&str>().unwrap(), "flaky renderer");
    assert!(registry.contains("visualizer", "side"));
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}
