use std::path::{Path, PathBuf};

use crate::{
    color::model::{Color, Palette},
    foundation::core::{AnimationDuration, Canvas, FrameRate},
    foundation::error::{TideloopError, TideloopResult},
    style::{AnimationStyle, StyleKind},
};

pub const ENV_FRAME_RATE: &str = "TIDELOOP_FRAME_RATE";
pub const ENV_OUT_DIR: &str = "TIDELOOP_OUT_DIR";

/// Studio defaults shared by every CLI subcommand, loadable from JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub colors: [String; 2],
    pub style: StyleKind,
    pub duration_secs: f64,
    pub frame_rate: u32,
    pub width: u32,
    pub height: u32,
    pub out_dir: PathBuf,
    pub gif_speed: i32,
    pub parallel: bool,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            colors: ["#ff00cc".to_string(), "#3333ff".to_string()],
            style: StyleKind::GradientSweep,
            duration_secs: 10.0,
            frame_rate: 30,
            width: 640,
            height: 256,
            out_dir: PathBuf::from("."),
            gif_speed: crate::export::gif::DEFAULT_GIF_SPEED,
            parallel: false,
        }
    }
}

impl StudioConfig {
    /// Read a JSON config file, apply environment overrides, then validate the result.
    pub fn load(path: &Path) -> TideloopResult<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    pub fn load_with(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> TideloopResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            TideloopError::config(format!("failed to read config '{}': {e}", path.display()))
        })?;
        let mut cfg = Self::from_json_str(&text)?;
        cfg.apply_env_with(lookup);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(text: &str) -> TideloopResult<Self> {
        serde_json::from_str(text).map_err(|e| TideloopError::config(format!("invalid config: {e}")))
    }

    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`. Unparseable values are ignored with a warning.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup(ENV_FRAME_RATE) {
            match v.trim().parse::<u32>() {
                Ok(fps) if fps > 0 => self.frame_rate = fps,
                _ => tracing::warn!(value = %v, "ignoring invalid {ENV_FRAME_RATE}"),
            }
        }
        if let Some(v) = lookup(ENV_OUT_DIR)
            && !v.is_empty()
        {
            self.out_dir = PathBuf::from(v);
        }
    }

    pub fn validate(&self) -> TideloopResult<()> {
        for c in &self.colors {
            Color::parse_hex(c)
                .map_err(|_| TideloopError::config(format!("color '{c}' is not #RRGGBB")))?;
        }
        if !self.duration().is_ok_and(|d| d.is_within_ui_range()) {
            return Err(TideloopError::config(format!(
                "duration_secs must be within [{}, {}], got {}",
                AnimationDuration::UI_MIN_SECS,
                AnimationDuration::UI_MAX_SECS,
                self.duration_secs
            )));
        }
        if self.frame_rate == 0 {
            return Err(TideloopError::config("frame_rate must be positive"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(TideloopError::config("width/height must be positive"));
        }
        Ok(())
    }

    /// Palette from the configured colors; malformed entries fall back.
    pub fn palette(&self) -> Palette {
        Palette::from_tokens(&self.colors[0], &self.colors[1])
    }

    pub fn animation_style(&self) -> AnimationStyle {
        AnimationStyle::from(self.style)
    }

    pub fn duration(&self) -> TideloopResult<AnimationDuration> {
        AnimationDuration::from_secs(self.duration_secs)
    }

    pub fn frame_rate(&self) -> TideloopResult<FrameRate> {
        FrameRate::new(self.frame_rate)
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
