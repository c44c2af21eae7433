use std::f64::consts::PI;

use kurbo::{Circle, Shape as _};

use crate::{
    color::model::Palette,
    foundation::core::{BezPath, Canvas, Point, Progress},
    scene::plan::{CURVE_TOLERANCE, FramePlan, Paint},
    style::frame_metrics,
};

/// Rising and setting disc behind a large gradient wave that drifts across the frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TsunamiWave {
    /// Disc radius as a fraction of `min(width, height)`.
    pub celestial_radius_ratio: f64,
    /// Disc center x as a fraction of the width.
    pub celestial_x_ratio: f64,
    /// Peak rise of the disc as a fraction of the height.
    pub celestial_rise_ratio: f64,
    pub celestial_alpha: f64,
    /// Wave extent as fractions of width and height.
    pub wave_width_ratio: f64,
    pub wave_height_ratio: f64,
    /// Draw neighbor copies one frame-width apart so the drift wraps around.
    pub wrap: bool,
}

impl Default for TsunamiWave {
    fn default() -> Self {
        Self {
            celestial_radius_ratio: 0.1,
            celestial_x_ratio: 0.1,
            celestial_rise_ratio: 0.4,
            celestial_alpha: 0.8,
            wave_width_ratio: 1.5,
            wave_height_ratio: 0.6,
            wrap: true,
        }
    }
}

impl TsunamiWave {
    /// Disc center and radius: `y = h − r − h·rise·sin(2πp)`.
    pub fn celestial(&self, progress: Progress, canvas: Canvas) -> (Point, f64) {
        let (w, h) = frame_metrics(canvas);
        let radius = canvas.min_side() * self.celestial_radius_ratio;
        let y = h - radius - h * self.celestial_rise_ratio * progress.radians().sin();
        (Point::new(w * self.celestial_x_ratio, y), radius)
    }

    /// Left edge of the primary wave copy: `−w/2 + p·w`.
    pub fn wave_x(&self, progress: Progress, canvas: Canvas) -> f64 {
        let (w, _) = frame_metrics(canvas);
        -0.5 * w + progress.value() * w
    }

    /// Wave outline with its left edge at `x0`, following `h − H·sin²(πx/W)`.
    pub fn wave_outline(&self, x0: f64, canvas: Canvas) -> BezPath {
        let (w, h) = frame_metrics(canvas);
        let wave_w = w * self.wave_width_ratio;
        let wave_h = h * self.wave_height_ratio;

        let mut path = BezPath::new();
        path.move_to((x0, h));
        // Integer steps, plus one final sample exactly at the right edge.
        let steps = wave_w.floor() as u64;
        for i in 0..=steps {
            let x = i as f64;
            path.line_to((x0 + x, h - wave_h * (x / wave_w * PI).sin().powi(2)));
        }
        path.line_to((x0 + wave_w, h));
        path.close_path();
        path
    }

    /// Left edges of every wave copy that intersects the frame, in draw order.
    pub fn wave_copies(&self, progress: Progress, canvas: Canvas) -> Vec<f64> {
        let (w, _) = frame_metrics(canvas);
        let wave_w = w * self.wave_width_ratio;
        let x = self.wave_x(progress, canvas);
        if !self.wrap {
            return vec![x];
        }
        let reach = (wave_w / w.max(1.0)).ceil() as i64 + 1;
        (-reach..=reach)
            .map(|k| x + k as f64 * w)
            .filter(|&x0| x0 + wave_w > 0.0 && x0 < w)
            .collect()
    }

    pub(crate) fn plan_into(&self, palette: Palette, progress: Progress, plan: &mut FramePlan) {
        let canvas = plan.canvas;
        plan.fill_canvas(Paint::Solid(palette.base.opaque()));

        let (center, radius) = self.celestial(progress, canvas);
        plan.fill_path(
            Circle::new(center, radius).to_path(CURVE_TOLERANCE),
            Paint::Solid(palette.accent.with_alpha(self.celestial_alpha)),
        );

        let wave_w = f64::from(canvas.width) * self.wave_width_ratio;
        for x0 in self.wave_copies(progress, canvas) {
            plan.fill_path(
                self.wave_outline(x0, canvas),
                Paint::Linear {
                    start: Point::new(x0, 0.0),
                    end: Point::new(x0 + wave_w, 0.0),
                    stops: [palette.base.opaque(), palette.accent.opaque()],
                },
            );
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/tsunami.rs"]
mod tests;
