use crate::{
    color::model::Palette,
    foundation::core::{Canvas, Progress},
    scene::plan::FramePlan,
    style::AnimationStyle,
};

/// Build the draw ops for one frame of `style`.
///
/// Pure and deterministic: identical arguments always produce an identical plan. `progress` is
/// used as given (callers wrap it).
#[tracing::instrument(level = "trace", skip(style, palette))]
pub fn plan_frame(
    style: &AnimationStyle,
    palette: Palette,
    progress: Progress,
    canvas: Canvas,
) -> FramePlan {
    let mut plan = FramePlan::new(canvas);
    if canvas.is_empty() {
        return plan;
    }
    style.plan_into(palette, progress, &mut plan);
    plan
}

#[cfg(test)]
#[path = "../../tests/unit/scene/compile.rs"]
mod tests;
