//! Phase portraits: each selected mode traced in the complex plane.

use crate::error::RenderError;
use crate::render::{Figure, RenderRequest, Series};

/// Exported attribute name of the renderer.
pub const ATTRIBUTE: &str = "render_phase_portrait";

pub fn render_phase_portrait(request: &RenderRequest) -> Result<Figure, RenderError> {
    request.validate()?;

    let series = request
        .selected_modes()?
        .into_iter()
        .map(|m| Series {
            label: format!("mode {}", m),
            points: request.modes[m].clone(),
        })
        .collect();

    Ok(Figure {
        kind: "phase_portrait".to_string(),
        title: request
            .title
            .clone()
            .unwrap_or_else(|| "Phase portrait".to_string()),
        x_label: "Re(α)".to_string(),
        y_label: "Im(α)".to_string(),
        series,
    })
}
