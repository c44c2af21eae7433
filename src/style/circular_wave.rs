use std::f64::consts::TAU;

use kurbo::{Circle, Ellipse, Shape as _};

use crate::{
    color::model::{Color, Palette, Rgba8},
    foundation::core::{Affine, BezPath, Canvas, Point, Progress},
    scene::plan::{CURVE_TOLERANCE, FramePlan, Paint},
    style::frame_metrics,
};

/// One rotating ellipse inside the [`CircularWave`] clip.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CircleLayer {
    /// Added to the per-loop rotation `2πp`, in radians.
    pub phase_offset: f64,
    /// Ellipse radii as fractions of the clip radius.
    pub radius_x: f64,
    pub radius_y: f64,
    /// Distance of the ellipse center from the frame center, as a fraction of the clip radius.
    pub center_offset: f64,
    pub alpha: f64,
}

/// Boundary ring, optionally with a wider translucent glow stroke under it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RingStroke {
    pub color: Color,
    pub width: f64,
    pub glow: Option<Glow>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Glow {
    pub color: Color,
    pub alpha: f64,
    pub blur: f64,
}

/// Radial darkening toward the clip edge.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InnerShadow {
    /// Where the shadow starts, as a fraction of the clip radius.
    pub start_ratio: f64,
    /// Black alpha reached at the clip edge.
    pub alpha: f64,
}

/// Circular clip with layered semi-transparent rotating ellipses (standing-wave look).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CircularWave {
    /// Clip radius as a fraction of `min(width, height)`.
    pub radius_ratio: f64,
    pub layers: Vec<CircleLayer>,
    pub ring: Option<RingStroke>,
    pub inner_shadow: Option<InnerShadow>,
}

impl Default for CircularWave {
    fn default() -> Self {
        let layer = |phase_offset: f64, radius_x: f64, radius_y: f64, alpha: f64| CircleLayer {
            phase_offset,
            radius_x,
            radius_y,
            center_offset: 0.5,
            alpha,
        };
        Self {
            radius_ratio: 0.4,
            layers: vec![
                layer(0.0, 1.0, 0.6, 0.4),
                layer(TAU / 3.0, 0.9, 0.5, 0.3),
                layer(2.0 * TAU / 3.0, 0.8, 0.4, 0.2),
            ],
            ring: Some(RingStroke {
                color: Color::WHITE,
                width: 5.0,
                glow: Some(Glow {
                    color: Color::rgb(0x49, 0x73, 0xFF),
                    alpha: 0.5,
                    blur: 5.0,
                }),
            }),
            inner_shadow: Some(InnerShadow {
                start_ratio: 0.8,
                alpha: 0.3,
            }),
        }
    }
}

impl CircularWave {
    pub fn center(canvas: Canvas) -> Point {
        let (w, h) = frame_metrics(canvas);
        Point::new(w / 2.0, h / 2.0)
    }

    pub fn radius(&self, canvas: Canvas) -> f64 {
        canvas.min_side() * self.radius_ratio
    }

    /// Rotation of `layer` at `progress`: one revolution per loop plus the layer's phase.
    pub fn layer_angle(layer: &CircleLayer, progress: Progress) -> f64 {
        progress.radians() + layer.phase_offset
    }

    fn layer_path(layer: &CircleLayer, center: Point, radius: f64, progress: Progress) -> BezPath {
        let ellipse = Ellipse::new(
            (0.0, radius * layer.center_offset),
            (radius * layer.radius_x, radius * layer.radius_y),
            0.0,
        );
        let mut path = ellipse.to_path(CURVE_TOLERANCE);
        path.apply_affine(
            Affine::translate(center.to_vec2())
                * Affine::rotate(Self::layer_angle(layer, progress)),
        );
        path
    }

    pub(crate) fn plan_into(&self, palette: Palette, progress: Progress, plan: &mut FramePlan) {
        let center = Self::center(plan.canvas);
        let radius = self.radius(plan.canvas);
        let clip = Circle::new(center, radius).to_path(CURVE_TOLERANCE);

        plan.push_clip(clip.clone());
        plan.fill_canvas(Paint::Solid(palette.base.opaque()));

        for layer in &self.layers {
            let path = Self::layer_path(layer, center, radius, progress);
            plan.fill_path(path, Paint::Solid(palette.accent.with_alpha(layer.alpha)));
        }

        if let Some(ring) = &self.ring {
            if let Some(glow) = &ring.glow {
                plan.stroke_path(
                    clip.clone(),
                    ring.width + 2.0 * glow.blur,
                    Paint::Solid(glow.color.with_alpha(glow.alpha)),
                );
            }
            plan.stroke_path(clip.clone(), ring.width, Paint::Solid(ring.color.opaque()));
        }

        if let Some(shadow) = &self.inner_shadow {
            plan.fill_path(
                clip,
                Paint::Radial {
                    center,
                    start_radius: radius * shadow.start_ratio,
                    end_radius: radius,
                    stops: [Rgba8::TRANSPARENT, Color::BLACK.with_alpha(shadow.alpha)],
                },
            );
        }

        plan.pop_clip();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/circular_wave.rs"]
mod tests;
