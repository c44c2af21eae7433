use crate::{
    color::model::Rgba8,
    foundation::core::{BezPath, Canvas, Point, Rect},
    foundation::error::{TideloopError, TideloopResult},
};

/// Flattening tolerance used when turning circles and ellipses into paths.
pub const CURVE_TOLERANCE: f64 = 0.1;

/// Fill source for a draw op. Colors are straight alpha.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba8),
    /// Two-stop linear gradient; stop 0 at `start`, stop 1 at `end`.
    Linear {
        start: Point,
        end: Point,
        stops: [Rgba8; 2],
    },
    /// Two-stop concentric radial gradient between `start_radius` and `end_radius`.
    Radial {
        center: Point,
        start_radius: f64,
        end_radius: f64,
        stops: [Rgba8; 2],
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    FillRect { rect: Rect, paint: Paint },
    FillPath { path: BezPath, paint: Paint },
    StrokePath { path: BezPath, width: f64, paint: Paint },
    /// Restrict subsequent ops to `path` until the matching [`DrawOp::PopClip`].
    PushClip { path: BezPath },
    PopClip,
}

/// Backend-agnostic description of one frame: ops are executed in order over a surface that
/// starts fully transparent.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    pub canvas: Canvas,
    pub ops: Vec<DrawOp>,
}

impl FramePlan {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            ops: Vec::new(),
        }
    }

    /// Whole-canvas rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            f64::from(self.canvas.width),
            f64::from(self.canvas.height),
        )
    }

    pub fn fill_canvas(&mut self, paint: Paint) {
        let rect = self.bounds();
        self.ops.push(DrawOp::FillRect { rect, paint });
    }

    pub fn fill_path(&mut self, path: BezPath, paint: Paint) {
        self.ops.push(DrawOp::FillPath { path, paint });
    }

    pub fn stroke_path(&mut self, path: BezPath, width: f64, paint: Paint) {
        self.ops.push(DrawOp::StrokePath { path, width, paint });
    }

    pub fn push_clip(&mut self, path: BezPath) {
        self.ops.push(DrawOp::PushClip { path });
    }

    pub fn pop_clip(&mut self) {
        self.ops.push(DrawOp::PopClip);
    }

    /// Check that every clip push has a matching pop and no pop underflows.
    pub fn validate(&self) -> TideloopResult<()> {
        let mut depth = 0usize;
        for op in &self.ops {
            match op {
                DrawOp::PushClip { .. } => depth += 1,
                DrawOp::PopClip => {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        TideloopError::render("frame plan pops a clip that was never pushed")
                    })?;
                }
                _ => {}
            }
        }
        if depth != 0 {
            return Err(TideloopError::render(format!(
                "frame plan leaves {depth} clip layer(s) open"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/plan.rs"]
mod tests;
