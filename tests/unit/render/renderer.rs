use super::*;
use crate::style::StyleKind;

#[test]
fn every_style_renders_opaque_or_clipped_pixels() {
    let canvas = Canvas::new(64, 32);
    let palette = Palette::default();
    for kind in StyleKind::ALL {
        let style = AnimationStyle::from(kind);
        let frame = render_frame(&style, palette, Progress::new(0.25), canvas).unwrap();
        assert_eq!(frame.data.len(), canvas.rgba_len());
        assert!(frame.premultiplied);
        assert!(frame.data.chunks_exact(4).any(|px| px[3] == 255), "{kind}");
    }
}

#[test]
fn zero_sized_canvas_renders_nothing() {
    let frame = render_frame(
        &AnimationStyle::default(),
        Palette::default(),
        Progress::ZERO,
        Canvas::new(0, 10),
    )
    .unwrap();
    assert!(frame.data.is_empty());
}

#[test]
fn clear_color_fills_outside_circular_clip() {
    let mut renderer = FrameRenderer::new(RenderSettings {
        clear_rgba: Some(Rgba8::new(0, 0, 0, 255)),
    });
    let style = AnimationStyle::from(StyleKind::CircularWave);
    let frame = renderer
        .render_frame(&style, Palette::default(), Progress::ZERO, Canvas::new(100, 40))
        .unwrap();
    assert_eq!(&frame.data[..4], &[0, 0, 0, 255]);
}

#[test]
fn circular_wave_corners_are_transparent_by_default() {
    let style = AnimationStyle::from(StyleKind::CircularWave);
    let frame = render_frame(&style, Palette::default(), Progress::ZERO, Canvas::new(100, 40))
        .unwrap();
    assert_eq!(frame.data[3], 0);
    let center = (20 * 100 + 50) * 4;
    assert!(frame.data[center + 3] > 0);
}

#[test]
fn reusing_a_renderer_matches_fresh_renders() {
    let canvas = Canvas::new(48, 24);
    let palette = Palette::default();
    let mut renderer = FrameRenderer::default();
    let mut surface = Surface::new(canvas).unwrap();
    for kind in StyleKind::ALL {
        let style = AnimationStyle::from(kind);
        renderer
            .render(&style, palette, Progress::new(0.6), &mut surface)
            .unwrap();
        let fresh = render_frame(&style, palette, Progress::new(0.6), canvas).unwrap();
        assert_eq!(surface.data(), fresh.data.as_slice(), "{kind}");
    }
}
