use super::*;

#[test]
fn new_surface_is_transparent() {
    let s = Surface::new(Canvas::new(4, 3)).unwrap();
    assert_eq!(s.data().len(), 4 * 3 * 4);
    assert!(s.data().iter().all(|&b| b == 0));
    assert_eq!(s.pixel(4, 0), None);
}

#[test]
fn oversized_surfaces_are_rejected() {
    assert!(Surface::new(Canvas::new(70_000, 1)).is_err());
    assert!(Surface::new(Canvas::new(1, 70_000)).is_err());
}

#[test]
fn clear_premultiplies() {
    let mut s = Surface::new(Canvas::new(2, 2)).unwrap();
    s.clear(Rgba8::new(255, 0, 0, 128));
    assert_eq!(&s.data()[..4], &[128, 0, 0, 128]);
    assert_eq!(s.pixel(1, 1), Some(Rgba8::new(255, 0, 0, 128)));
}

#[test]
fn resize_reallocates_only_on_change() {
    let mut s = Surface::new(Canvas::new(2, 2)).unwrap();
    s.clear(Rgba8::new(1, 1, 1, 255));
    s.resize(Canvas::new(2, 2)).unwrap();
    assert_eq!(s.data()[3], 255);
    s.resize(Canvas::new(3, 1)).unwrap();
    assert_eq!(s.canvas(), Canvas::new(3, 1));
    assert!(s.data().iter().all(|&b| b == 0));
}

#[test]
fn straight_conversion_undoes_premultiplication() {
    let frame = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![128, 0, 64, 128, 10, 20, 30, 255],
        premultiplied: true,
    };
    assert_eq!(
        frame.to_straight_rgba8(),
        vec![255, 0, 128, 128, 10, 20, 30, 255]
    );
}
