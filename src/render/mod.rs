pub(crate) mod cpu;
pub(crate) mod renderer;
pub(crate) mod surface;

pub use cpu::CpuRasterizer;
pub use renderer::{FrameRenderer, RenderSettings, render_frame};
pub use surface::{FrameRGBA, Surface};
