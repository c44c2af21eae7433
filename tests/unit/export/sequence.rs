use super::*;
use crate::export::sink::InMemorySink;
use crate::style::StyleKind;

fn request(kind: StyleKind, secs: f64, fps: u32, target: ExportTarget) -> ExportRequest {
    ExportRequest {
        palette: Palette::default(),
        style: AnimationStyle::from(kind),
        duration: AnimationDuration::from_secs(secs).unwrap(),
        frame_rate: FrameRate::new(fps).unwrap(),
        target,
    }
}

#[test]
fn job_schedule_covers_one_loop() {
    let job = ExportJob::new(request(
        StyleKind::GradientSweep,
        10.0,
        30,
        ExportTarget::Offscreen(Canvas::new(8, 4)),
    ))
    .unwrap();
    assert_eq!(job.frame_count(), 300);
    assert_eq!(job.progress_at(0), Progress::ZERO);
    assert!((job.progress_at(150).value() - 0.5).abs() < 1e-12);
    assert!(job.progress_at(299).value() < 1.0);
    assert!((job.delay_ms() - 33.333).abs() < 0.001);
    assert_eq!(job.file_name("gif"), "gradient-animation.gif");
}

#[test]
fn job_rejects_empty_schedules() {
    let req = request(
        StyleKind::GradientSweep,
        0.01,
        30,
        ExportTarget::Offscreen(Canvas::new(8, 4)),
    );
    assert!(ExportJob::new(req).is_err());
}

#[test]
fn offscreen_export_pushes_every_frame_in_order() {
    let exporter = RasterSequenceExporter::default();
    let mut sink = InMemorySink::new();
    let blob = exporter
        .export(
            &request(
                StyleKind::TsunamiWave,
                5.0,
                4,
                ExportTarget::Offscreen(Canvas::new(8, 4)),
            ),
            &mut sink,
        )
        .unwrap();
    assert_eq!(blob.file_name, "tsunami-animation.rgba");
    assert_eq!(blob.len(), 20 * 8 * 4 * 4);
    let indices: Vec<u64> = sink.frames().iter().map(|f| f.index.0).collect();
    assert_eq!(indices, (0..20).collect::<Vec<_>>());
}

#[test]
fn parallel_export_matches_sequential() {
    let req = request(
        StyleKind::HorizontalWave,
        5.0,
        3,
        ExportTarget::Offscreen(Canvas::new(12, 6)),
    );
    let mut seq = InMemorySink::new();
    RasterSequenceExporter::default()
        .export(&req, &mut seq)
        .unwrap();

    let parallel = RasterSequenceExporter::new(
        RenderSettings::default(),
        RenderThreading {
            parallel: true,
            chunk_size: 4,
            threads: Some(2),
        },
    );
    let mut par = InMemorySink::new();
    parallel.export(&req, &mut par).unwrap();
    assert_eq!(seq.frames(), par.frames());
}

#[test]
fn element_target_uses_element_size() {
    let stage = Stage::new();
    stage.mount("wave", Canvas::new(10, 5));
    let exporter = RasterSequenceExporter::default().with_stage(stage);
    let mut sink = InMemorySink::new();
    exporter
        .export(
            &request(
                StyleKind::CircularWave,
                5.0,
                1,
                ExportTarget::Element("wave".into()),
            ),
            &mut sink,
        )
        .unwrap();
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (10, 5));
    assert_eq!(sink.frames().len(), 5);
}

#[test]
fn missing_element_fails_with_target_not_found() {
    let exporter = RasterSequenceExporter::default().with_stage(Stage::new());
    let mut sink = InMemorySink::new();
    let err = exporter
        .export(
            &request(
                StyleKind::GradientSweep,
                5.0,
                30,
                ExportTarget::Element("missing".into()),
            ),
            &mut sink,
        )
        .unwrap_err();
    assert!(matches!(err, TideloopError::TargetNotFound(ref id) if id == "missing"));
    assert!(err.to_string().contains("Target element not found"));
    assert!(sink.frames().is_empty());
}

#[test]
fn zero_threads_is_a_validation_error() {
    let exporter = RasterSequenceExporter::new(
        RenderSettings::default(),
        RenderThreading {
            parallel: true,
            chunk_size: 8,
            threads: Some(0),
        },
    );
    let mut sink = InMemorySink::new();
    let req = request(
        StyleKind::GradientSweep,
        5.0,
        1,
        ExportTarget::Offscreen(Canvas::new(4, 4)),
    );
    assert!(exporter.export(&req, &mut sink).is_err());
}

/// Unmounts `id` once `after` frames have been pushed into the wrapped sink.
struct UnmountAfter<S> {
    inner: S,
    stage: Stage,
    id: &'static str,
    after: u64,
    pushed: u64,
    aborted: bool,
}

impl<S: FrameSink> UnmountAfter<S> {
    fn new(inner: S, stage: &Stage, id: &'static str, after: u64) -> Self {
        Self {
            inner,
            stage: stage.clone(),
            id,
            after,
            pushed: 0,
            aborted: false,
        }
    }
}

impl<S: FrameSink> FrameSink for UnmountAfter<S> {
    fn file_extension(&self) -> &'static str {
        self.inner.file_extension()
    }

    fn begin(&mut self, cfg: SinkConfig) -> TideloopResult<()> {
        self.inner.begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TideloopResult<()> {
        self.inner.push_frame(idx, frame)?;
        self.pushed += 1;
        if self.pushed == self.after {
            self.stage.unmount(self.id);
        }
        Ok(())
    }

    fn end(&mut self, file_name: String) -> TideloopResult<Blob> {
        self.inner.end(file_name)
    }

    fn abort(&mut self) {
        self.aborted = true;
        self.inner.abort();
    }
}

#[test]
fn unmount_during_sequential_export_aborts_and_discards_the_gif() {
    let stage = Stage::new();
    stage.mount("el", Canvas::new(8, 8));
    let exporter = RasterSequenceExporter::default().with_stage(stage.clone());
    let mut sink = UnmountAfter::new(
        crate::export::gif::GifSink::new().with_speed(30),
        &stage,
        "el",
        3,
    );

    let err = exporter
        .export(
            &request(
                StyleKind::CircularWave,
                5.0,
                2,
                ExportTarget::Element("el".into()),
            ),
            &mut sink,
        )
        .unwrap_err();
    assert!(matches!(err, TideloopError::TargetNotFound(ref id) if id == "el"));
    assert_eq!(sink.pushed, 3);
    assert!(sink.aborted);
    assert!(sink.inner.end("x.gif".to_string()).is_err());
}

#[test]
fn unmount_during_parallel_export_stops_at_the_next_chunk() {
    let stage = Stage::new();
    stage.mount("el", Canvas::new(6, 4));
    let exporter = RasterSequenceExporter::new(
        RenderSettings::default(),
        RenderThreading {
            parallel: true,
            chunk_size: 4,
            threads: Some(2),
        },
    )
    .with_stage(stage.clone());
    let mut sink = UnmountAfter::new(InMemorySink::new(), &stage, "el", 3);

    let err = exporter
        .export(
            &request(
                StyleKind::HorizontalWave,
                5.0,
                2,
                ExportTarget::Element("el".into()),
            ),
            &mut sink,
        )
        .unwrap_err();
    assert!(matches!(err, TideloopError::TargetNotFound(_)));
    assert_eq!(sink.pushed, 4);
    assert!(sink.aborted);
    assert!(sink.inner.frames().is_empty());
    assert!(sink.inner.end("x.rgba".to_string()).is_err());
}

#[test]
fn rejected_begin_still_aborts_the_sink() {
    let exporter = RasterSequenceExporter::new(
        RenderSettings::default(),
        RenderThreading {
            parallel: true,
            ..RenderThreading::default()
        },
    );
    let mut sink = UnmountAfter::new(
        crate::export::gif::GifSink::new(),
        &Stage::new(),
        "unused",
        u64::MAX,
    );
    let req = request(
        StyleKind::GradientSweep,
        5.0,
        1,
        ExportTarget::Offscreen(Canvas::new(70_000, 1)),
    );
    assert!(exporter.export(&req, &mut sink).is_err());
    assert!(sink.aborted);
}
