//! Power spectral density of each selected mode.
//!
//! Two-sided periodogram of the complex amplitude, `P(f_k) = |X_k|^2 dt / N`,
//! with frequencies ordered from most negative to most positive.

use std::f64::consts::TAU;

use crate::error::RenderError;
use crate::render::{Figure, RenderRequest, Series};

/// Exported attribute name of the renderer.
pub const ATTRIBUTE: &str = "render_psd";

pub fn render_psd(request: &RenderRequest) -> Result<Figure, RenderError> {
    request.validate()?;

    let series = request
        .selected_modes()?
        .into_iter()
        .map(|m| Series {
            label: format!("mode {}", m),
            points: periodogram(&request.modes[m], request.dt),
        })
        .collect();

    Ok(Figure {
        kind: "psd".to_string(),
        title: request
            .title
            .clone()
            .unwrap_or_else(|| "Power spectral density".to_string()),
        x_label: "frequency".to_string(),
        y_label: "power".to_string(),
        series,
    })
}

/// Direct DFT periodogram, returned as `[frequency, power]` pairs.
fn periodogram(samples: &[[f64; 2]], dt: f64) -> Vec<[f64; 2]> {
    let n = samples.len();
    let scale = dt / n as f64;
    let df = 1.0 / (n as f64 * dt);

    let mut spectrum: Vec<[f64; 2]> = (0..n)
        .map(|k| {
            let (mut re, mut im) = (0.0, 0.0);
            for (t, [x, y]) in samples.iter().enumerate() {
                let phase = -TAU * (k * t) as f64 / n as f64;
                let (sin, cos) = phase.sin_cos();
                re += x * cos - y * sin;
                im += x * sin + y * cos;
            }
            // Bins above n/2 are negative frequencies.
            let bin = if k <= (n - 1) / 2 {
                k as f64
            } else {
                k as f64 - n as f64
            };
            [bin * df, (re * re + im * im) * scale]
        })
        .collect();

    spectrum.sort_by(|a, b| a[0].total_cmp(&b[0]));
    spectrum
}
