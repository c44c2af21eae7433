use std::sync::Arc;

use crate::{
    color::model::Rgba8,
    foundation::core::{BezPath, Canvas, Point},
    foundation::error::{TideloopError, TideloopResult},
    render::surface::{Surface, dims_u16, premul_rgba8},
    scene::plan::{DrawOp, FramePlan, Paint},
};

/// Executes [`FramePlan`]s with `vello_cpu`, reusing one render context across frames.
#[derive(Default)]
pub struct CpuRasterizer {
    ctx: Option<vello_cpu::RenderContext>,
}

impl CpuRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rasterize `plan` into `surface`, replacing its previous contents.
    ///
    /// The surface starts from `clear` (transparent when `None`) and then receives every op in
    /// plan order.
    pub fn execute(
        &mut self,
        plan: &FramePlan,
        clear: Option<Rgba8>,
        surface: &mut Surface,
    ) -> TideloopResult<()> {
        if plan.canvas != surface.canvas() {
            return Err(TideloopError::render(format!(
                "plan canvas {}x{} does not match surface {}x{}",
                plan.canvas.width,
                plan.canvas.height,
                surface.canvas().width,
                surface.canvas().height
            )));
        }
        plan.validate()?;

        let clear = clear.unwrap_or(Rgba8::TRANSPARENT);
        if plan.canvas.is_empty() {
            surface.clear(clear);
            return Ok(());
        }

        let (width, height) = dims_u16(plan.canvas)?;
        surface.clear(Rgba8::TRANSPARENT);
        self.with_ctx_mut(width, height, |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            if clear.a > 0 {
                ctx.set_paint(color_to_cpu(clear));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(width),
                    f64::from(height),
                ));
            }

            for op in &plan.ops {
                match op {
                    DrawOp::FillRect { rect, paint } => {
                        set_paint(ctx, paint, plan.canvas)?;
                        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                            rect.x0, rect.y0, rect.x1, rect.y1,
                        ));
                    }
                    DrawOp::FillPath { path, paint } => {
                        set_paint(ctx, paint, plan.canvas)?;
                        ctx.fill_path(&bezpath_to_cpu(path));
                    }
                    DrawOp::StrokePath { path, width, paint } => {
                        if !(width.is_finite() && *width > 0.0) {
                            continue;
                        }
                        set_paint(ctx, paint, plan.canvas)?;
                        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                        ctx.stroke_path(&bezpath_to_cpu(path));
                    }
                    DrawOp::PushClip { path } => {
                        ctx.push_clip_layer(&bezpath_to_cpu(path));
                    }
                    DrawOp::PopClip => ctx.pop_layer(),
                }
            }

            ctx.flush();
            ctx.render_to_pixmap(surface.pixmap_mut());
            Ok(())
        })
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> TideloopResult<R>,
    ) -> TideloopResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }
}

fn set_paint(
    ctx: &mut vello_cpu::RenderContext,
    paint: &Paint,
    canvas: Canvas,
) -> TideloopResult<()> {
    match paint {
        Paint::Solid(c) => ctx.set_paint(color_to_cpu(*c)),
        Paint::Linear { .. } | Paint::Radial { .. } => {
            ctx.set_paint(gradient_image(paint, canvas)?);
        }
    }
    Ok(())
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

/// Gradient parameter at a pixel center, clamped to `[0, 1]`.
fn gradient_t(paint: &Paint, p: Point) -> f64 {
    let t = match paint {
        Paint::Solid(_) => 0.0,
        Paint::Linear { start, end, .. } => {
            let axis = *end - *start;
            let len2 = axis.hypot2();
            if len2 <= f64::EPSILON {
                0.0
            } else {
                (p - *start).dot(axis) / len2
            }
        }
        Paint::Radial {
            center,
            start_radius,
            end_radius,
            ..
        } => {
            let span = end_radius - start_radius;
            if span.abs() <= f64::EPSILON {
                if p.distance(*center) >= *end_radius { 1.0 } else { 0.0 }
            } else {
                (p.distance(*center) - start_radius) / span
            }
        }
    };
    if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 }
}

/// Bake a gradient paint into a canvas-sized premultiplied image, interpolating between the two
/// premultiplied stops.
fn gradient_image(paint: &Paint, canvas: Canvas) -> TideloopResult<vello_cpu::Image> {
    let stops = match paint {
        Paint::Solid(c) => [*c, *c],
        Paint::Linear { stops, .. } | Paint::Radial { stops, .. } => *stops,
    };
    let s = premul_rgba8(stops[0]);
    let e = premul_rgba8(stops[1]);

    let mut bytes = vec![0u8; canvas.rgba_len()];
    for y in 0..canvas.height {
        for x in 0..canvas.width {
            let t = gradient_t(
                paint,
                Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5),
            );
            let lerp = |a: u8, b: u8| -> u8 {
                let af = f64::from(a);
                let bf = f64::from(b);
                (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
            };
            let idx = ((y as usize) * (canvas.width as usize) + (x as usize)) * 4;
            bytes[idx..idx + 4].copy_from_slice(&[
                lerp(s[0], e[0]),
                lerp(s[1], e[1]),
                lerp(s[2], e[2]),
                lerp(s[3], e[3]),
            ]);
        }
    }
    rgba_premul_to_image(&bytes, canvas)
}

fn rgba_premul_to_image(bytes_premul: &[u8], canvas: Canvas) -> TideloopResult<vello_cpu::Image> {
    let (w, h) = dims_u16(canvas)?;
    if bytes_premul.len() != canvas.rgba_len() {
        return Err(TideloopError::render("pixmap byte len mismatch"));
    }
    let mut pixels =
        Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(bytes_premul.len() / 4);
    let mut opaque = true;
    for px in bytes_premul.chunks_exact(4) {
        opaque &= px[3] == 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, !opaque);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
