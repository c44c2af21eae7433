use crate::{
    color::model::Rgba8,
    foundation::core::Canvas,
    foundation::error::{TideloopError, TideloopResult},
};

/// A rendered frame as RGBA8 pixels.
///
/// Frames leaving a [`Surface`] are **premultiplied**; the flag makes this explicit at API
/// boundaries (encoders and PNG writers convert as needed).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    /// Straight-alpha copy of the pixels.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }
}

/// Mutable premultiplied RGBA8 raster of fixed size, owned by whoever renders into it.
pub struct Surface {
    canvas: Canvas,
    pixmap: vello_cpu::Pixmap,
}

impl Surface {
    /// Allocate a transparent surface. Fails when a side exceeds the rasterizer's `u16` range.
    pub fn new(canvas: Canvas) -> TideloopResult<Self> {
        let (w, h) = dims_u16(canvas)?;
        Ok(Self {
            canvas,
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Reallocate for `canvas` if the size changed. Contents are not preserved.
    pub fn resize(&mut self, canvas: Canvas) -> TideloopResult<()> {
        if canvas == self.canvas {
            return Ok(());
        }
        *self = Self::new(canvas)?;
        Ok(())
    }

    pub fn clear(&mut self, rgba: Rgba8) {
        let premul = premul_rgba8(rgba);
        for px in self.pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&premul);
        }
    }

    /// Premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut vello_cpu::Pixmap {
        &mut self.pixmap
    }

    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.data().to_vec(),
            premultiplied: true,
        }
    }

    /// Straight-alpha RGBA8 value of one pixel, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.canvas.width || y >= self.canvas.height {
            return None;
        }
        let i = (y as usize * self.canvas.width as usize + x as usize) * 4;
        let px = &self.data()[i..i + 4];
        let a = u16::from(px[3]);
        let unpremul = |c: u8| -> u8 {
            if a == 0 {
                0
            } else {
                ((u16::from(c) * 255 + a / 2) / a).min(255) as u8
            }
        };
        Some(Rgba8::new(
            unpremul(px[0]),
            unpremul(px[1]),
            unpremul(px[2]),
            px[3],
        ))
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}

pub(crate) fn dims_u16(canvas: Canvas) -> TideloopResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| TideloopError::render("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| TideloopError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

pub(crate) fn premul_rgba8(c: Rgba8) -> [u8; 4] {
    let premul = |v: u8| -> u8 { (((u16::from(v) * u16::from(c.a)) + 127) / 255) as u8 };
    [premul(c.r), premul(c.g), premul(c.b), c.a]
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
