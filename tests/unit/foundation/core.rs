use super::*;

#[test]
fn fps_rejects_zero_terms() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    let fps = Fps::new(60, 1).unwrap();
    assert!((fps.frame_duration_ms() - 16.666_666).abs() < 1e-3);
}

#[test]
fn margin_shrink_never_inverts() {
    let b = box_from_origin_size(10.0, 10.0, 20.0, 4.0);
    let m = Margin {
        left: 2.0,
        right: 3.0,
        top: 3.0,
        bottom: 3.0,
    };
    let s = m.shrink(b);
    assert_eq!(s.x0, 12.0);
    assert_eq!(s.width(), 15.0);
    assert_eq!(s.height(), 0.0);
}

#[test]
fn box_helpers() {
    let a = box_from_origin_size(0.0, 0.0, 10.0, 10.0);
    let b = box_from_origin_size(10.0, 20.0, 30.0, 10.0);
    let mid = interpolate_box(a, b, 0.5);
    assert_eq!(mid, Rect::new(5.0, 10.0, 25.0, 20.0));
    assert_eq!(
        clamp_box_to_pixel(Rect::new(0.4, 0.6, 9.2, 9.9)),
        Rect::new(0.0, 0.0, 10.0, 10.0)
    );
    assert!(box_contains(a, Point::new(0.0, 0.0)));
    assert!(!box_contains(a, Point::new(10.0, 5.0)));
}
