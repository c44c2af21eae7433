use crate::{
    color::model::Palette,
    foundation::core::{Canvas, Point, Progress},
    scene::plan::{FramePlan, Paint},
    style::frame_metrics,
};

/// Linear two-color gradient whose axis rotates around the frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GradientSweep {
    /// Full rotations of the gradient axis per loop. Must be whole to keep the loop seamless.
    pub turns_per_loop: u32,
}

impl Default for GradientSweep {
    fn default() -> Self {
        Self { turns_per_loop: 1 }
    }
}

impl GradientSweep {
    /// Gradient endpoints: `A = (w cos θ, h sin θ)` and its antipodal phase `B` at `θ + π`.
    pub fn axis(&self, progress: Progress, canvas: Canvas) -> (Point, Point) {
        let (w, h) = frame_metrics(canvas);
        let turns = progress.value() * f64::from(self.turns_per_loop);
        let a = Progress::new(turns).radians();
        let b = Progress::new(turns + 0.5).radians();
        (
            Point::new(w * a.cos(), h * a.sin()),
            Point::new(w * b.cos(), h * b.sin()),
        )
    }

    pub(crate) fn plan_into(&self, palette: Palette, progress: Progress, plan: &mut FramePlan) {
        let (start, end) = self.axis(progress, plan.canvas);
        plan.fill_canvas(Paint::Linear {
            start,
            end,
            stops: [palette.base.opaque(), palette.accent.opaque()],
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/gradient.rs"]
mod tests;
