use super::*;

#[test]
fn progress_wraps_into_unit_interval() {
    assert_eq!(Progress::wrapped(1.0), Progress::ZERO);
    assert_eq!(Progress::wrapped(2.25), Progress(0.25));
    assert_eq!(Progress::wrapped(-0.25), Progress(0.75));
    assert_eq!(Progress::wrapped(f64::NAN), Progress::ZERO);
    assert!(Progress::wrapped(-1e-18).value() < 1.0);
}

#[test]
fn progress_from_elapsed_follows_duration() {
    let d = AnimationDuration::from_secs(10.0).unwrap();
    assert_eq!(
        Progress::from_elapsed(Duration::from_millis(2_500), d),
        Progress(0.25)
    );
    let wrapped = Progress::from_elapsed(Duration::from_secs(12), d).value();
    assert!((wrapped - 0.2).abs() < 1e-12);
}

#[test]
fn duration_rejects_non_positive_values() {
    assert!(AnimationDuration::from_secs(0.0).is_err());
    assert!(AnimationDuration::from_secs(-3.0).is_err());
    assert!(AnimationDuration::from_secs(f64::INFINITY).is_err());
    assert!(AnimationDuration::from_secs(0.5).is_ok());
}

#[test]
fn duration_ui_range_and_frame_count() {
    let d = AnimationDuration::from_secs(2.0).unwrap();
    assert!(!d.is_within_ui_range());
    assert!(AnimationDuration::from_secs(30.0).unwrap().is_within_ui_range());

    let d = AnimationDuration::from_secs(10.0).unwrap();
    assert_eq!(d.frame_count(FrameRate::new(30).unwrap()), 300);

    let d = AnimationDuration::from_secs(1.25).unwrap();
    assert_eq!(d.frame_count(FrameRate::new(10).unwrap()), 13);
}

#[test]
fn frame_rate_delay() {
    assert!(FrameRate::new(0).is_err());
    let r = FrameRate::new(30).unwrap();
    assert!((r.frame_delay_ms() - 33.333_333).abs() < 1e-3);
}

#[test]
fn canvas_helpers() {
    let c = Canvas::new(640, 256);
    assert_eq!(c.rgba_len(), 640 * 256 * 4);
    assert_eq!(c.min_side(), 256.0);
    assert!(!c.is_empty());
    assert!(Canvas::new(0, 10).is_empty());
}
