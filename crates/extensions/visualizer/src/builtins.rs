//! Built-in renderer registration.

use qphase_core::{Namespaced, StaticLoader};
use qphase_protocols::error::RegistryError;
use qphase_protocols::{Artifact, Registrar, TargetRef};
use tracing::debug;

use crate::NAMESPACE;
use crate::plotters::{PHASE_PLANE_MODULE, PSD_MODULE, phase_plane, psd};
use crate::render::Renderer;

/// Registry key, module path and exported attribute of each built-in.
const BUILTINS: &[(&str, &str, &str)] = &[
    ("phase_portrait", PHASE_PLANE_MODULE, phase_plane::ATTRIBUTE),
    ("psd", PSD_MODULE, psd::ATTRIBUTE),
];

/// Register the built-in renderers lazily under the `visualizer` namespace.
///
/// Only target references are stored; the plotter modules are loaded the
/// first time a key is resolved.
pub fn register_builtins(registrar: &dyn Registrar) -> Result<(), RegistryError> {
    let visualizer = Namespaced::new(registrar, NAMESPACE);
    for (key, module, attribute) in BUILTINS {
        visualizer.register_lazy(key, TargetRef::new(*module, *attribute)?, true)?;
    }
    debug!("Registered {} built-in renderers", BUILTINS.len());
    Ok(())
}

/// Define the plotter modules on `loader`.
pub fn define_builtin_modules(loader: &StaticLoader) {
    loader.define(PHASE_PLANE_MODULE, |module, _| {
        module.insert(
            phase_plane::ATTRIBUTE,
            Artifact::new(Renderer::new(phase_plane::render_phase_portrait)),
        );
        Ok(())
    });
    loader.define(PSD_MODULE, |module, _| {
        module.insert(
            psd::ATTRIBUTE,
            Artifact::new(Renderer::new(psd::render_psd)),
        );
        Ok(())
    });
}

/// A loader with the plotter modules already defined.
pub fn builtin_loader() -> StaticLoader {
    let loader = StaticLoader::new();
    define_builtin_modules(&loader);
    loader
}
