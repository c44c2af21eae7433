use std::time::Duration;

use crate::{
    foundation::core::{FrameIndex, FrameRate},
    foundation::error::{TideloopError, TideloopResult},
    render::surface::FrameRGBA,
};

#[derive(Clone, Debug, PartialEq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    pub frame_rate: FrameRate,
    /// Total frames the exporter will push.
    pub frame_count: u64,
}

impl SinkConfig {
    pub fn validate(&self) -> TideloopResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TideloopError::validation(
                "sink width/height must be non-zero",
            ));
        }
        if self.frame_count == 0 {
            return Err(TideloopError::validation(
                "sink needs at least one frame",
            ));
        }
        Ok(())
    }

    /// Uniform inter-frame delay, `1000 / frame_rate` ms.
    pub fn frame_delay(&self) -> Duration {
        Duration::from_secs_f64(self.frame_rate.frame_delay_ms() / 1000.0)
    }
}

/// A finished export payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    pub mime: &'static str,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Blob {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Append-only incremental encoder.
///
/// `begin` is called once, then `push_frame` for every index in strictly increasing order, then
/// `end` once to produce the blob. After a failure `abort` discards everything pushed so far, and
/// a later `end` fails instead of yielding a partial blob.
pub trait FrameSink {
    /// Extension of the produced file, without the dot.
    fn file_extension(&self) -> &'static str;
    fn begin(&mut self, cfg: SinkConfig) -> TideloopResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TideloopResult<()>;
    fn end(&mut self, file_name: String) -> TideloopResult<Blob>;
    fn abort(&mut self) {}
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedFrame {
    pub index: FrameIndex,
    pub delay: Duration,
    pub frame: FrameRGBA,
}

/// Keeps every pushed frame in memory; the blob is the concatenated straight-alpha pixels.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<RecordedFrame>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn file_extension(&self) -> &'static str {
        "rgba"
    }

    fn begin(&mut self, cfg: SinkConfig) -> TideloopResult<()> {
        cfg.validate()?;
        self.frames = Vec::with_capacity(cfg.frame_count.min(4096) as usize);
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TideloopResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| TideloopError::export("push_frame before begin"))?;
        check_frame(cfg, idx, frame, self.frames.last().map(|f| f.index))?;
        self.frames.push(RecordedFrame {
            index: idx,
            delay: cfg.frame_delay(),
            frame: frame.clone(),
        });
        Ok(())
    }

    fn end(&mut self, file_name: String) -> TideloopResult<Blob> {
        if self.cfg.is_none() {
            return Err(TideloopError::export("end before begin"));
        }
        let mut bytes = Vec::new();
        for f in &self.frames {
            bytes.extend_from_slice(&f.frame.to_straight_rgba8());
        }
        Ok(Blob {
            mime: "application/octet-stream",
            file_name,
            bytes,
        })
    }

    fn abort(&mut self) {
        self.cfg = None;
        self.frames.clear();
    }
}

/// Shared per-frame checks: size matches the config and indices strictly increase.
pub(crate) fn check_frame(
    cfg: &SinkConfig,
    idx: FrameIndex,
    frame: &FrameRGBA,
    last: Option<FrameIndex>,
) -> TideloopResult<()> {
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(TideloopError::export(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    if frame.data.len() != (cfg.width as usize) * (cfg.height as usize) * 4 {
        return Err(TideloopError::export("frame byte length mismatch"));
    }
    if let Some(last) = last
        && idx.0 <= last.0
    {
        return Err(TideloopError::export(format!(
            "frames must be pushed in increasing order (got {} after {})",
            idx.0, last.0
        )));
    }
    if idx.0 >= cfg.frame_count {
        return Err(TideloopError::export(format!(
            "frame index {} out of range for {} frames",
            idx.0, cfg.frame_count
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/export/sink.rs"]
mod tests;
