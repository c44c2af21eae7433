use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    foundation::error::{TideloopError, TideloopResult},
    playback::stage::Stage,
    style::StyleKind,
};

/// Saves the frame currently shown by a stage element as a PNG.
#[derive(Clone, Debug)]
pub struct StillExporter {
    out_dir: PathBuf,
    style: StyleKind,
}

impl StillExporter {
    pub fn new(out_dir: impl Into<PathBuf>, style: StyleKind) -> Self {
        Self {
            out_dir: out_dir.into(),
            style,
        }
    }

    pub fn set_style(&mut self, style: StyleKind) {
        self.style = style;
    }

    /// `{out_dir}/{style}-animation.png`.
    pub fn target_path(&self) -> PathBuf {
        self.out_dir.join(self.style.file_name("png"))
    }

    /// Write the element's current frame. Failures are logged and yield `None`.
    pub fn capture(&self, stage: &Stage, element_id: &str) -> Option<PathBuf> {
        match self.try_capture(stage, element_id) {
            Ok(path) => {
                tracing::debug!(path = %path.display(), "still saved");
                Some(path)
            }
            Err(e) => {
                tracing::error!(element = element_id, error = %e, "still capture failed");
                None
            }
        }
    }

    fn try_capture(&self, stage: &Stage, element_id: &str) -> TideloopResult<PathBuf> {
        let element = stage
            .element(element_id)
            .ok_or_else(|| TideloopError::target_not_found(element_id))?;
        let frame = element.latest_frame().ok_or_else(|| {
            TideloopError::export(format!("element '{element_id}' has not presented a frame"))
        })?;

        let path = self.target_path();
        ensure_dir(&self.out_dir)?;
        image::save_buffer_with_format(
            &path,
            &frame.to_straight_rgba8(),
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(path)
    }
}

fn ensure_dir(dir: &Path) -> TideloopResult<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/export/still.rs"]
mod tests;
