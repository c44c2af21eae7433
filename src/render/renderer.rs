use crate::{
    color::model::{Palette, Rgba8},
    foundation::core::{Canvas, Progress},
    foundation::error::TideloopResult,
    render::{
        cpu::CpuRasterizer,
        surface::{FrameRGBA, Surface},
    },
    scene::compile::plan_frame,
    style::AnimationStyle,
};

#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// Straight-alpha color the surface is cleared to before drawing; transparent when `None`.
    pub clear_rgba: Option<Rgba8>,
}

/// The single render contract shared by preview and export.
///
/// Each call fully overwrites the target surface; nothing accumulates between frames.
#[derive(Default)]
pub struct FrameRenderer {
    settings: RenderSettings,
    raster: CpuRasterizer,
}

impl FrameRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            raster: CpuRasterizer::new(),
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn render(
        &mut self,
        style: &AnimationStyle,
        palette: Palette,
        progress: Progress,
        surface: &mut Surface,
    ) -> TideloopResult<()> {
        let plan = plan_frame(style, palette, progress, surface.canvas());
        self.raster
            .execute(&plan, self.settings.clear_rgba, surface)
    }

    /// Render into a fresh surface of `canvas` and return its pixels.
    pub fn render_frame(
        &mut self,
        style: &AnimationStyle,
        palette: Palette,
        progress: Progress,
        canvas: Canvas,
    ) -> TideloopResult<FrameRGBA> {
        let mut surface = Surface::new(canvas)?;
        self.render(style, palette, progress, &mut surface)?;
        Ok(surface.to_frame())
    }
}

/// One-shot render with default settings.
pub fn render_frame(
    style: &AnimationStyle,
    palette: Palette,
    progress: Progress,
    canvas: Canvas,
) -> TideloopResult<FrameRGBA> {
    FrameRenderer::default().render_frame(style, palette, progress, canvas)
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
