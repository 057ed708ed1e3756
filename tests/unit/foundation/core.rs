use super::*;

#[test]
fn fps_frame_times_floor_to_millis() {
    let fps = Fps::new(60, 1).unwrap();
    assert_eq!(fps.frame_time(0), Millis(0));
    assert_eq!(fps.frame_time(1), Millis(16));
    assert_eq!(fps.frame_time(3), Millis(50));
    assert_eq!(fps.frame_time(60), Millis(1000));
}

#[test]
fn fps_frame_times_are_strictly_increasing() {
    let fps = Fps::new(30000, 1001).unwrap();
    let mut prev = fps.frame_time(0);
    for idx in 1..500u64 {
        let t = fps.frame_time(idx);
        assert!(t > prev);
        prev = t;
    }
}

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(60, 0).is_err());
}

#[test]
fn millis_arithmetic_saturates() {
    assert_eq!(Millis(5) - Millis(9), Millis::ZERO);
    assert_eq!(Millis(u64::MAX) + Millis(1), Millis(u64::MAX));
    assert_eq!(Millis::from_secs_f64(3.5), Millis(3500));
    assert_eq!(Millis(1500).as_secs_f64(), 1.5);
}

#[test]
fn viewport_center_and_validation() {
    let vp = Viewport::new(800, 600).unwrap();
    assert_eq!(vp.center(), Point::new(400.0, 300.0));
    assert!(Viewport::new(0, 10).is_err());
}

#[test]
fn premultiply_scales_channels_by_alpha() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.to_array(), [128, 64, 0, 128]);
    let faded = Rgba8Premul::from_straight_with_opacity([255, 255, 255, 255], 0.0);
    assert_eq!(faded, Rgba8Premul::transparent());
}
