//! Renderer contract and the render entry point.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use qphase_core::Registry;

use crate::NAMESPACE;
use crate::error::{RenderError, VisualizerError};

/// Input to a renderer: sampled complex mode trajectories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// `modes[m][t] = [re, im]` for mode `m` at sample `t`.
    pub modes: Vec<Vec<[f64; 2]>>,

    /// Sample interval.
    #[serde(default = "default_dt")]
    pub dt: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Renderer-specific options.
    #[serde(default)]
    pub options: serde_json::Value,
}

fn default_dt() -> f64 {
    1.0
}

impl RenderRequest {
    pub fn new(modes: Vec<Vec<[f64; 2]>>, dt: f64) -> Self {
        Self {
            modes,
            dt,
            title: None,
            options: serde_json::Value::Null,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_options(mut self, options: serde_json::Value) -> Self {
        self.options = options;
        self
    }

    /// Reject empty, ragged or badly sampled input.
    pub fn validate(&self) -> Result<(), RenderError> {
        let len = match self.modes.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(RenderError::EmptyInput),
        };
        if self.modes.iter().any(|mode| mode.len() != len) {
            return Err(RenderError::RaggedModes);
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(RenderError::InvalidSampleInterval(self.dt));
        }
        Ok(())
    }

    /// Mode indices chosen by the `modes` option, or all modes.
    pub fn selected_modes(&self) -> Result<Vec<usize>, RenderError> {
        let available = self.modes.len();
        let Some(selection) = self.options.get("modes") else {
            return Ok((0..available).collect());
        };

        let indices = selection
            .as_array()
            .ok_or_else(|| RenderError::InvalidOption {
                option: "modes".to_string(),
                message: "expected an array of mode indices".to_string(),
            })?;

        indices
            .iter()
            .map(|value| {
                let index = value
                    .as_u64()
                    .ok_or_else(|| RenderError::InvalidOption {
                        option: "modes".to_string(),
                        message: format!("{} is not a mode index", value),
                    })? as usize;
                if index >= available {
                    return Err(RenderError::UnknownMode { index, available });
                }
                Ok(index)
            })
            .collect()
    }
}

/// One plotted line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

/// Renderer output: plain data series, ready for any plotting backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub kind: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

type RenderFn = dyn Fn(&RenderRequest) -> Result<Figure, RenderError> + Send + Sync;

/// A registered renderer. Plugin modules export values of this type.
#[derive(Clone)]
pub struct Renderer(Arc<RenderFn>);

impl Renderer {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&RenderRequest) -> Result<Figure, RenderError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn render(&self, request: &RenderRequest) -> Result<Figure, RenderError> {
        (self.0)(request)
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Renderer")
    }
}

/// Resolve `visualizer:<key>` and render `request` with it.
pub fn render(
    registry: &Registry,
    key: &str,
    request: &RenderRequest,
) -> Result<Figure, VisualizerError> {
    let renderer = registry.resolve_as::<Renderer>(NAMESPACE, key)?;
    Ok(renderer.render(request)?)
}
