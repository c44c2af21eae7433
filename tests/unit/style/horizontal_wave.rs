use super::*;
use crate::scene::plan::DrawOp;

#[test]
fn band_baseline_and_amplitude() {
    let band = WaveBand {
        frequency: 0.0,
        amplitude: 0.25,
        phase_multiplier: 1,
        phase_shift: std::f64::consts::FRAC_PI_2,
        alpha: 1.0,
    };
    // sin(π/2) = 1 so the crest reaches the baseline plus one amplitude.
    assert!((band.y_at(10.0, Progress::ZERO, 200.0) - 200.0).abs() < 1e-9);
    // Half a loop later the phase is 3π/2 and the trough sits one amplitude above baseline.
    assert!((band.y_at(10.0, Progress::new(0.5), 200.0) - 100.0).abs() < 1e-9);
}

#[test]
fn band_phase_is_periodic_over_one_loop() {
    let band = HorizontalWave::default().bands[0].clone();
    for x in [0.0, 17.0, 333.0, 640.0] {
        let a = band.y_at(x, Progress::ZERO, 256.0);
        let b = band.y_at(x, Progress::new(1.0), 256.0);
        assert!((a - b).abs() < 1e-9, "x={x}");
    }
}

#[test]
fn outline_spans_the_full_width() {
    let band = HorizontalWave::default().bands[1].clone();
    let path = band.outline(Progress::new(0.3), Canvas::new(64, 32));
    // move_to + (w + 1) samples + closing corner + close_path
    assert_eq!(path.elements().len(), 1 + 65 + 1 + 1);
}

#[test]
fn plan_layers_background_then_bands() {
    let style = HorizontalWave::default();
    let palette = Palette::from_tokens("#102030", "#A0B0C0");
    let mut plan = FramePlan::new(Canvas::new(32, 16));
    style.plan_into(palette, Progress::ZERO, &mut plan);

    assert_eq!(plan.ops.len(), 1 + style.bands.len());
    assert!(matches!(
        &plan.ops[0],
        DrawOp::FillRect { paint: Paint::Solid(c), .. } if *c == palette.base.opaque()
    ));
    let alphas: Vec<u8> = plan.ops[1..]
        .iter()
        .map(|op| match op {
            DrawOp::FillPath {
                paint: Paint::Solid(c),
                ..
            } => c.a,
            other => panic!("unexpected op {other:?}"),
        })
        .collect();
    assert_eq!(alphas.len(), 3);
    assert_eq!(alphas[1], 128);
    assert!(alphas[0] > alphas[1] && alphas[1] > alphas[2]);
}
