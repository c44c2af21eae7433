//! Tideloop renders seamlessly looping 2D background animations.
//!
//! Every frame is a pure function of `(style, palette, progress, canvas)`:
//!
//! - [`plan_frame`] turns a style into backend-agnostic draw ops
//! - [`FrameRenderer`] rasterizes them on the CPU
//! - [`LoopScheduler`] drives a live preview from a clock
//! - [`RasterSequenceExporter`] renders one full loop into a [`FrameSink`] such as [`GifSink`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod color;
pub mod config;
pub(crate) mod export;
pub(crate) mod playback;
pub(crate) mod render;
pub(crate) mod scene;
pub mod style;

pub use crate::color::model::{
    Color, FALLBACK_COLOR, Palette, Rgba8, contrast_ratio, luminance, normalize,
};
pub use crate::config::StudioConfig;
pub use crate::export::{
    Blob, DEFAULT_GIF_SPEED, ExportHandle, ExportJob, ExportRequest, ExportTarget, ExportTrigger,
    FrameSink, FrameSource, GIF_MIME, GifSink, InMemorySink, RasterSequenceExporter,
    RecordedFrame, RenderThreading, RendererSource, SinkConfig, StageCapture, StillExporter,
};
pub use crate::foundation::core::{
    Affine, AnimationDuration, BezPath, Canvas, FrameIndex, FrameRate, Point, Progress, Rect,
    Vec2,
};
pub use crate::foundation::error::{TideloopError, TideloopResult};
pub use crate::playback::{
    Clock, FixedRatePacer, LoopParams, LoopScheduler, ManualClock, Presenter, RefreshPacer,
    SchedulerState, Stage, StageElement, StopHandle, SystemClock,
};
pub use crate::render::{
    CpuRasterizer, FrameRGBA, FrameRenderer, RenderSettings, Surface, render_frame,
};
pub use crate::scene::compile::plan_frame;
pub use crate::scene::plan::{CURVE_TOLERANCE, DrawOp, FramePlan, Paint};
pub use crate::style::{AnimationStyle, StyleKind};
