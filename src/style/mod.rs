//! Animation styles and their per-style procedural geometry.
//!
//! Each [`AnimationStyle`] variant carries only the constants its own algorithm needs; the
//! `Default` of every parameter struct is the canonical look. All phase terms complete a whole
//! number of turns per loop so that `progress = 0` and `progress -> 1` join seamlessly.

pub(crate) mod circular_wave;
pub(crate) mod gradient;
pub(crate) mod horizontal_wave;
pub(crate) mod tsunami;

use std::fmt;

use crate::{
    color::model::Palette,
    foundation::core::{Canvas, Progress},
    foundation::error::{TideloopError, TideloopResult},
    scene::plan::FramePlan,
};

pub use circular_wave::{CircleLayer, CircularWave, InnerShadow, RingStroke};
pub use gradient::GradientSweep;
pub use horizontal_wave::{HorizontalWave, WaveBand};
pub use tsunami::TsunamiWave;

/// Closed set of animation styles.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind")]
pub enum AnimationStyle {
    #[serde(rename = "gradient")]
    GradientSweep(GradientSweep),
    #[serde(rename = "horizontalWave")]
    HorizontalWave(HorizontalWave),
    #[serde(rename = "circularWave", alias = "standingWave")]
    CircularWave(CircularWave),
    #[serde(rename = "tsunami")]
    TsunamiWave(TsunamiWave),
}

impl AnimationStyle {
    pub fn kind(&self) -> StyleKind {
        match self {
            Self::GradientSweep(_) => StyleKind::GradientSweep,
            Self::HorizontalWave(_) => StyleKind::HorizontalWave,
            Self::CircularWave(_) => StyleKind::CircularWave,
            Self::TsunamiWave(_) => StyleKind::TsunamiWave,
        }
    }

    /// Append this style's ops for one frame to `plan`.
    pub(crate) fn plan_into(&self, palette: Palette, progress: Progress, plan: &mut FramePlan) {
        match self {
            Self::GradientSweep(s) => s.plan_into(palette, progress, plan),
            Self::HorizontalWave(s) => s.plan_into(palette, progress, plan),
            Self::CircularWave(s) => s.plan_into(palette, progress, plan),
            Self::TsunamiWave(s) => s.plan_into(palette, progress, plan),
        }
    }
}

impl Default for AnimationStyle {
    fn default() -> Self {
        Self::GradientSweep(GradientSweep::default())
    }
}

impl From<StyleKind> for AnimationStyle {
    fn from(kind: StyleKind) -> Self {
        match kind {
            StyleKind::GradientSweep => Self::GradientSweep(GradientSweep::default()),
            StyleKind::HorizontalWave => Self::HorizontalWave(HorizontalWave::default()),
            StyleKind::CircularWave => Self::CircularWave(CircularWave::default()),
            StyleKind::TsunamiWave => Self::TsunamiWave(TsunamiWave::default()),
        }
    }
}

/// Fieldless style tag used for selection, config files and output file names.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum StyleKind {
    #[default]
    #[serde(rename = "gradient")]
    GradientSweep,
    #[serde(rename = "horizontalWave")]
    HorizontalWave,
    #[serde(rename = "circularWave", alias = "standingWave")]
    CircularWave,
    #[serde(rename = "tsunami")]
    TsunamiWave,
}

impl StyleKind {
    pub const ALL: [StyleKind; 4] = [
        Self::GradientSweep,
        Self::HorizontalWave,
        Self::CircularWave,
        Self::TsunamiWave,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::GradientSweep => "gradient",
            Self::HorizontalWave => "horizontalWave",
            Self::CircularWave => "circularWave",
            Self::TsunamiWave => "tsunami",
        }
    }

    /// `{name}-animation.{ext}`, the download name for exports of this style.
    pub fn file_name(self, ext: &str) -> String {
        format!("{}-animation.{ext}", self.name())
    }
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for StyleKind {
    type Err = TideloopError;

    fn from_str(s: &str) -> TideloopResult<Self> {
        match s {
            "gradient" => Ok(Self::GradientSweep),
            "horizontalWave" | "horizontal-wave" => Ok(Self::HorizontalWave),
            "circularWave" | "circular-wave" | "standingWave" | "standing-wave" => {
                Ok(Self::CircularWave)
            }
            "tsunami" => Ok(Self::TsunamiWave),
            other => Err(TideloopError::validation(format!(
                "unknown animation style \"{other}\" (expected one of: gradient, horizontalWave, circularWave, tsunami)"
            ))),
        }
    }
}

/// Canvas width and height as floats.
pub(crate) fn frame_metrics(canvas: Canvas) -> (f64, f64) {
    (f64::from(canvas.width), f64::from(canvas.height))
}

#[cfg(test)]
#[path = "../../tests/unit/style/mod.rs"]
mod tests;
