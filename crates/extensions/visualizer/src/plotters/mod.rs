//! Built-in plotter modules.
//!
//! Each plotter is exposed to the registry as a module of the static loader;
//! its renderer is constructed when the module is first loaded.

pub mod phase_plane;
pub mod psd;

/// Module path of the phase portrait plotter.
pub const PHASE_PLANE_MODULE: &str = "qphase.visualizer.plotters.phase_plane";

/// Module path of the power spectral density plotter.
pub const PSD_MODULE: &str = "qphase.visualizer.plotters.psd";
