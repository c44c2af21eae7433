use super::*;
use crate::{
    color::model::Palette,
    foundation::core::{Canvas, Progress},
    playback::scheduler::Presenter,
    render::{FrameRenderer, Surface},
    style::AnimationStyle,
};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tideloop_still_{}_{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn writes_png_named_after_the_style() {
    let stage = Stage::new();
    let mut el = stage.mount("preview", Canvas::new(8, 4));
    let mut surface = Surface::new(Canvas::new(8, 4)).unwrap();
    FrameRenderer::default()
        .render(
            &AnimationStyle::from(StyleKind::TsunamiWave),
            Palette::default(),
            Progress::new(0.3),
            &mut surface,
        )
        .unwrap();
    el.present(&surface).unwrap();

    let dir = scratch_dir("ok");
    let still = StillExporter::new(&dir, StyleKind::TsunamiWave);
    let path = still.capture(&stage, "preview").unwrap();
    assert_eq!(path, dir.join("tsunami-animation.png"));
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (8, 4));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_element_or_frame_returns_none() {
    let stage = Stage::new();
    let dir = scratch_dir("none");
    let still = StillExporter::new(&dir, StyleKind::GradientSweep);
    assert!(still.capture(&stage, "nope").is_none());

    stage.mount("blank", Canvas::new(2, 2));
    assert!(still.capture(&stage, "blank").is_none());
    assert!(!dir.join("gradient-animation.png").exists());
}
