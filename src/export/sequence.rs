use rayon::prelude::*;

use crate::{
    color::model::Palette,
    export::sink::{Blob, FrameSink, SinkConfig},
    foundation::core::{AnimationDuration, Canvas, FrameIndex, FrameRate, Progress},
    foundation::error::{TideloopError, TideloopResult},
    playback::stage::Stage,
    render::{
        renderer::{FrameRenderer, RenderSettings},
        surface::{FrameRGBA, Surface},
    },
    style::AnimationStyle,
};

/// Produces the pixels of one frame at a given progress.
pub trait FrameSource {
    fn canvas(&self) -> Canvas;
    fn capture(&mut self, progress: Progress) -> TideloopResult<FrameRGBA>;
}

/// Renders straight into a reusable offscreen surface.
pub struct RendererSource {
    style: AnimationStyle,
    palette: Palette,
    renderer: FrameRenderer,
    surface: Surface,
}

impl RendererSource {
    pub fn new(
        style: AnimationStyle,
        palette: Palette,
        canvas: Canvas,
        settings: RenderSettings,
    ) -> TideloopResult<Self> {
        Ok(Self {
            style,
            palette,
            renderer: FrameRenderer::new(settings),
            surface: Surface::new(canvas)?,
        })
    }
}

impl FrameSource for RendererSource {
    fn canvas(&self) -> Canvas {
        self.surface.canvas()
    }

    fn capture(&mut self, progress: Progress) -> TideloopResult<FrameRGBA> {
        self.renderer
            .render(&self.style, self.palette, progress, &mut self.surface)?;
        Ok(self.surface.to_frame())
    }
}

/// Capture path for a mounted stage element: frames are rendered offscreen at the element's
/// size, and the element must stay mounted for the whole export.
pub struct StageCapture {
    stage: Stage,
    element_id: String,
    inner: RendererSource,
}

impl StageCapture {
    pub fn resolve(
        stage: &Stage,
        element_id: &str,
        style: AnimationStyle,
        palette: Palette,
        settings: RenderSettings,
    ) -> TideloopResult<Self> {
        let element = stage
            .element(element_id)
            .ok_or_else(|| TideloopError::target_not_found(element_id))?;
        Ok(Self {
            stage: stage.clone(),
            element_id: element_id.to_string(),
            inner: RendererSource::new(style, palette, element.canvas(), settings)?,
        })
    }
}

impl FrameSource for StageCapture {
    fn canvas(&self) -> Canvas {
        self.inner.canvas()
    }

    fn capture(&mut self, progress: Progress) -> TideloopResult<FrameRGBA> {
        if self.stage.element(&self.element_id).is_none() {
            return Err(TideloopError::target_not_found(&self.element_id));
        }
        self.inner.capture(progress)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExportTarget {
    /// Fresh offscreen surface of the given size.
    Offscreen(Canvas),
    /// Size taken from a mounted stage element.
    Element(String),
}

/// Immutable snapshot of everything one export needs.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportRequest {
    pub palette: Palette,
    pub style: AnimationStyle,
    pub duration: AnimationDuration,
    pub frame_rate: FrameRate,
    pub target: ExportTarget,
}

/// Transient state of one export: the frame schedule and the submission cursor.
#[derive(Debug)]
pub struct ExportJob {
    request: ExportRequest,
    frame_count: u64,
    cursor: u64,
}

impl ExportJob {
    pub fn new(request: ExportRequest) -> TideloopResult<Self> {
        let frame_count = request.duration.frame_count(request.frame_rate);
        if frame_count == 0 {
            return Err(TideloopError::validation(format!(
                "{}s at {} fps yields no frames",
                request.duration.secs(),
                request.frame_rate.get()
            )));
        }
        Ok(Self {
            request,
            frame_count,
            cursor: 0,
        })
    }

    pub fn request(&self) -> &ExportRequest {
        &self.request
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frames submitted so far.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// `i / frame_count`: frame 0 is progress 0 and the implied frame `frame_count` is the loop
    /// start again.
    pub fn progress_at(&self, i: u64) -> Progress {
        Progress::new(i as f64 / self.frame_count as f64)
    }

    pub fn delay_ms(&self) -> f64 {
        self.request.frame_rate.frame_delay_ms()
    }

    pub fn file_name(&self, ext: &str) -> String {
        self.request.style.kind().file_name(ext)
    }

    fn submit(
        &mut self,
        sink: &mut dyn FrameSink,
        frame: &FrameRGBA,
    ) -> TideloopResult<()> {
        sink.push_frame(FrameIndex(self.cursor), frame)?;
        self.cursor += 1;
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct RenderThreading {
    pub parallel: bool,
    pub chunk_size: usize,
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

/// Renders one full loop and feeds it, in index order, to a [`FrameSink`].
#[derive(Clone, Debug, Default)]
pub struct RasterSequenceExporter {
    pub settings: RenderSettings,
    pub threading: RenderThreading,
    stage: Option<Stage>,
}

impl RasterSequenceExporter {
    pub fn new(settings: RenderSettings, threading: RenderThreading) -> Self {
        Self {
            settings,
            threading,
            stage: None,
        }
    }

    /// Stage used to resolve [`ExportTarget::Element`] targets.
    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    #[tracing::instrument(
        skip(self, request, sink),
        fields(style = %request.style.kind(), frames = tracing::field::Empty)
    )]
    pub fn export(
        &self,
        request: &ExportRequest,
        sink: &mut dyn FrameSink,
    ) -> TideloopResult<Blob> {
        let mut job = ExportJob::new(request.clone())?;
        tracing::Span::current().record("frames", job.frame_count());

        // Workers render their own frames, so only the sequential path needs a source.
        let (mut source, canvas) = if self.threading.parallel {
            (None, self.target_canvas(&request.target)?)
        } else {
            let source = self.open_source(job.request())?;
            let canvas = source.canvas();
            (Some(source), canvas)
        };

        let result = sink
            .begin(SinkConfig {
                width: canvas.width,
                height: canvas.height,
                frame_rate: request.frame_rate,
                frame_count: job.frame_count(),
            })
            .and_then(|()| match source.as_deref_mut() {
                Some(source) => {
                    while job.cursor() < job.frame_count() {
                        let frame = source.capture(job.progress_at(job.cursor()))?;
                        job.submit(sink, &frame)?;
                    }
                    Ok(())
                }
                None => self.run_parallel(&mut job, canvas, sink),
            })
            .and_then(|()| {
                let file_name = job.file_name(sink.file_extension());
                sink.end(file_name)
            });

        match result {
            Ok(blob) => {
                tracing::debug!(bytes = blob.len(), file = %blob.file_name, "export finished");
                Ok(blob)
            }
            Err(e) => {
                sink.abort();
                tracing::warn!(submitted = job.cursor(), error = %e, "export aborted");
                Err(e)
            }
        }
    }

    fn target_canvas(&self, target: &ExportTarget) -> TideloopResult<Canvas> {
        match target {
            ExportTarget::Offscreen(canvas) => Ok(*canvas),
            ExportTarget::Element(id) => self
                .stage
                .as_ref()
                .and_then(|stage| stage.element(id))
                .map(|element| element.canvas())
                .ok_or_else(|| TideloopError::target_not_found(id)),
        }
    }

    fn open_source(&self, request: &ExportRequest) -> TideloopResult<Box<dyn FrameSource>> {
        match &request.target {
            ExportTarget::Offscreen(canvas) => Ok(Box::new(RendererSource::new(
                request.style.clone(),
                request.palette,
                *canvas,
                self.settings.clone(),
            )?)),
            ExportTarget::Element(id) => {
                let stage = self
                    .stage
                    .as_ref()
                    .ok_or_else(|| TideloopError::target_not_found(id))?;
                Ok(Box::new(StageCapture::resolve(
                    stage,
                    id,
                    request.style.clone(),
                    request.palette,
                    self.settings.clone(),
                )?))
            }
        }
    }

    /// Chunks are rendered on worker renderers, then submitted in index order.
    fn run_parallel(
        &self,
        job: &mut ExportJob,
        canvas: Canvas,
        sink: &mut dyn FrameSink,
    ) -> TideloopResult<()> {
        let pool = build_thread_pool(self.threading.threads)?;
        let chunk_size = normalized_chunk_size(self.threading.chunk_size);
        let style = job.request().style.clone();
        let palette = job.request().palette;
        let element = match &job.request().target {
            ExportTarget::Element(id) => Some(id.clone()),
            ExportTarget::Offscreen(_) => None,
        };

        while job.cursor() < job.frame_count() {
            let chunk_start = job.cursor();
            let chunk_end = (chunk_start + chunk_size).min(job.frame_count());
            if let (Some(id), Some(stage)) = (&element, &self.stage)
                && stage.element(id).is_none()
            {
                return Err(TideloopError::target_not_found(id));
            }

            let progress: Vec<Progress> =
                (chunk_start..chunk_end).map(|i| job.progress_at(i)).collect();
            let rendered = pool.install(|| {
                progress
                    .par_iter()
                    .map_init(
                        || FrameRenderer::new(self.settings.clone()),
                        |renderer, p| renderer.render_frame(&style, palette, *p, canvas),
                    )
                    .collect::<Vec<_>>()
            });

            for frame in rendered {
                job.submit(sink, &frame?)?;
            }
            tracing::debug!(chunk_start, chunk_end, "export chunk submitted");
        }
        Ok(())
    }
}

fn build_thread_pool(threads: Option<usize>) -> TideloopResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(TideloopError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| TideloopError::render(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 { 1 } else { chunk_size as u64 }
}

#[cfg(test)]
#[path = "../../tests/unit/export/sequence.rs"]
mod tests;
