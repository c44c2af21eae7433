use std::{
    io::Write,
    sync::{Arc, Mutex},
};

use image::codecs::gif::{GifEncoder, Repeat};

use crate::{
    color::model::Color,
    export::sink::{Blob, FrameSink, SinkConfig, check_frame},
    foundation::core::FrameIndex,
    foundation::error::{TideloopError, TideloopResult},
    render::surface::FrameRGBA,
};

pub const GIF_MIME: &str = "image/gif";

/// Quantizer speed passed to the encoder: 1 is slowest/best, 30 fastest.
pub const DEFAULT_GIF_SPEED: i32 = 10;

/// Looping GIF encoder. Frames keep their alpha unless a matte is set, in which case they are
/// flattened over it.
pub struct GifSink {
    speed: i32,
    matte: Option<Color>,
    state: Option<GifState>,
}

struct GifState {
    cfg: SinkConfig,
    encoder: GifEncoder<SharedBuf>,
    out: SharedBuf,
    last: Option<FrameIndex>,
    scratch: Vec<u8>,
}

impl GifSink {
    pub fn new() -> Self {
        Self {
            speed: DEFAULT_GIF_SPEED,
            matte: None,
            state: None,
        }
    }

    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed.clamp(1, 30);
        self
    }

    pub fn with_matte(mut self, matte: Option<Color>) -> Self {
        self.matte = matte;
        self
    }
}

impl Default for GifSink {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSink for GifSink {
    fn file_extension(&self) -> &'static str {
        "gif"
    }

    fn begin(&mut self, cfg: SinkConfig) -> TideloopResult<()> {
        cfg.validate()?;
        if cfg.width > u32::from(u16::MAX) || cfg.height > u32::from(u16::MAX) {
            return Err(TideloopError::export("gif dimensions exceed u16"));
        }
        let out = SharedBuf::default();
        let mut encoder = GifEncoder::new_with_speed(out.clone(), self.speed);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| TideloopError::export(format!("gif set_repeat failed: {e}")))?;
        let scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.state = Some(GifState {
            cfg,
            encoder,
            out,
            last: None,
            scratch,
        });
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TideloopResult<()> {
        let state = self
            .state
            .as_mut()
            .ok_or_else(|| TideloopError::export("push_frame before begin"))?;
        check_frame(&state.cfg, idx, frame, state.last)?;

        match self.matte {
            Some(matte) => flatten_to_opaque_rgba8(
                &mut state.scratch,
                &frame.data,
                frame.premultiplied,
                matte,
            )?,
            None => state.scratch.copy_from_slice(&frame.to_straight_rgba8()),
        }

        let img = image::RgbaImage::from_raw(frame.width, frame.height, state.scratch.clone())
            .ok_or_else(|| TideloopError::export("frame buffer does not match its size"))?;
        let cs = frame_delay_cs(state.cfg.frame_rate.get(), idx.0);
        let delay = image::Delay::from_numer_denom_ms(cs * 10, 1);
        state
            .encoder
            .encode_frame(image::Frame::from_parts(img, 0, 0, delay))
            .map_err(|e| TideloopError::export(format!("gif encode failed: {e}")))?;
        state.last = Some(idx);
        Ok(())
    }

    fn end(&mut self, file_name: String) -> TideloopResult<Blob> {
        let state = self
            .state
            .take()
            .ok_or_else(|| TideloopError::export("end before begin"))?;
        if state.last.is_none() {
            return Err(TideloopError::export("gif has no frames"));
        }
        let GifState { encoder, out, .. } = state;
        // The trailer is written when the encoder is dropped.
        drop(encoder);
        Ok(Blob {
            mime: GIF_MIME,
            file_name,
            bytes: out.take(),
        })
    }

    fn abort(&mut self) {
        self.state = None;
    }
}

/// GIF delays are whole centiseconds. Rounding the cumulative timestamp instead of each delay keeps
/// the loop length at `frame_count / fps` seconds; 30 fps yields a 3/4/3 cs cycle.
pub(crate) fn frame_delay_cs(fps: u32, idx: u64) -> u32 {
    let fps = u64::from(fps.max(1));
    let at = |i: u64| (i * 100 + fps / 2) / fps;
    ((at(idx + 1) - at(idx)) as u32).max(1)
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn take(&self) -> Vec<u8> {
        let mut guard = self.0.lock().unwrap_or_else(|p| p.into_inner());
        std::mem::take(&mut *guard)
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub(crate) fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    matte: Color,
) -> TideloopResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(TideloopError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg = [u16::from(matte.r), u16::from(matte.g), u16::from(matte.b)];
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        let inv = 255 - a;
        for c in 0..3 {
            let fg = if src_is_premul {
                u16::from(s[c])
            } else {
                mul_div255(u16::from(s[c]), a)
            };
            d[c] = (fg + mul_div255(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/export/gif.rs"]
mod tests;
