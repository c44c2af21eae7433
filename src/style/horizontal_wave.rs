use crate::{
    color::model::Palette,
    foundation::core::{BezPath, Canvas, Progress},
    scene::plan::{FramePlan, Paint},
    style::frame_metrics,
};

/// One translucent band of a [`HorizontalWave`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WaveBand {
    /// Radians per pixel along x.
    pub frequency: f64,
    /// Peak amplitude as a fraction of the canvas height. The band's baseline sits at
    /// `height - amplitude`.
    pub amplitude: f64,
    /// Whole phase turns per loop.
    pub phase_multiplier: u32,
    /// Constant phase offset in radians.
    pub phase_shift: f64,
    pub alpha: f64,
}

impl WaveBand {
    /// `y = sin(x·f + p·2π·m + φ)·A + (h − A)`.
    pub fn y_at(&self, x: f64, progress: Progress, height: f64) -> f64 {
        let amplitude = self.amplitude * height;
        let phase = progress.radians() * f64::from(self.phase_multiplier) + self.phase_shift;
        (x * self.frequency + phase).sin() * amplitude + (height - amplitude)
    }

    /// Closed band outline: from the bottom-left corner along the wave and back down to the
    /// bottom edge.
    pub fn outline(&self, progress: Progress, canvas: Canvas) -> BezPath {
        let (w, h) = frame_metrics(canvas);
        let mut path = BezPath::new();
        path.move_to((0.0, h));
        for x in 0..=canvas.width {
            let x = f64::from(x);
            path.line_to((x, self.y_at(x, progress, h)));
        }
        path.line_to((w, h));
        path.close_path();
        path
    }
}

/// Solid background with layered sine-wave bands in the accent color.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HorizontalWave {
    pub bands: Vec<WaveBand>,
}

impl Default for HorizontalWave {
    fn default() -> Self {
        let band = |amplitude: f64, alpha: f64| WaveBand {
            frequency: 0.02,
            amplitude,
            phase_multiplier: 2,
            phase_shift: 0.0,
            alpha,
        };
        Self {
            bands: vec![band(0.2, 0.7), band(0.3, 0.5), band(0.4, 0.3)],
        }
    }
}

impl HorizontalWave {
    pub(crate) fn plan_into(&self, palette: Palette, progress: Progress, plan: &mut FramePlan) {
        plan.fill_canvas(Paint::Solid(palette.base.opaque()));
        for band in &self.bands {
            let path = band.outline(progress, plan.canvas);
            plan.fill_path(path, Paint::Solid(palette.accent.with_alpha(band.alpha)));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/horizontal_wave.rs"]
mod tests;
