use std::time::Duration;

use crate::foundation::error::{TideloopError, TideloopResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Pixel dimensions of a raster surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Byte length of a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }

    pub fn min_side(self) -> f64 {
        f64::from(self.width.min(self.height))
    }
}

/// Fractional position within one loop period.
///
/// Renderers take the value as given; callers decide whether to wrap with [`Progress::wrapped`].
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Progress(pub f64);

impl Progress {
    pub const ZERO: Self = Self(0.0);

    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Wrap into `[0, 1)`. Non-finite input maps to zero.
    pub fn wrapped(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        let v = value.rem_euclid(1.0);
        // rem_euclid can round up to exactly 1.0 for tiny negative inputs.
        if v >= 1.0 { Self::ZERO } else { Self(v) }
    }

    /// `(elapsed / duration) mod 1`.
    pub fn from_elapsed(elapsed: Duration, duration: AnimationDuration) -> Self {
        Self::wrapped(elapsed.as_secs_f64() / duration.secs())
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Phase angle of this progress: one full turn per loop.
    pub fn radians(self) -> f64 {
        self.0 * std::f64::consts::TAU
    }
}

/// Length of one loop period in seconds.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct AnimationDuration(f64);

impl AnimationDuration {
    /// Slider range the preview UI exposes. The renderer itself imposes no bound.
    pub const UI_MIN_SECS: f64 = 5.0;
    pub const UI_MAX_SECS: f64 = 30.0;

    pub fn from_secs(secs: f64) -> TideloopResult<Self> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(TideloopError::validation(format!(
                "animation duration must be a positive number of seconds, got {secs}"
            )));
        }
        Ok(Self(secs))
    }

    pub fn secs(self) -> f64 {
        self.0
    }

    pub fn is_within_ui_range(self) -> bool {
        (Self::UI_MIN_SECS..=Self::UI_MAX_SECS).contains(&self.0)
    }

    /// `round(duration * frame_rate)`: the number of frames in one seamless loop.
    pub fn frame_count(self, rate: FrameRate) -> u64 {
        (self.0 * f64::from(rate.get())).round().max(0.0) as u64
    }
}

impl Default for AnimationDuration {
    fn default() -> Self {
        Self(10.0)
    }
}

/// Integer frames per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameRate(u32);

impl FrameRate {
    pub fn new(fps: u32) -> TideloopResult<Self> {
        if fps == 0 {
            return Err(TideloopError::validation("frame rate must be > 0"));
        }
        Ok(Self(fps))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Uniform inter-frame delay, `1000 / fps` milliseconds.
    pub fn frame_delay_ms(self) -> f64 {
        1000.0 / f64::from(self.0)
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self(30)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
