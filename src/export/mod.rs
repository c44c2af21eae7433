pub(crate) mod gif;
pub(crate) mod job;
pub(crate) mod sequence;
pub(crate) mod sink;
pub(crate) mod still;

pub use gif::{DEFAULT_GIF_SPEED, GIF_MIME, GifSink};
pub use job::{ExportHandle, ExportTrigger};
pub use sequence::{
    ExportJob, ExportRequest, ExportTarget, FrameSource, RasterSequenceExporter, RenderThreading,
    RendererSource, StageCapture,
};
pub use sink::{Blob, FrameSink, InMemorySink, RecordedFrame, SinkConfig};
pub use still::StillExporter;
