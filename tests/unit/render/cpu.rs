use super::*;
use crate::foundation::core::Point;

fn streak(from: (f64, f64), to: (f64, f64), width: f64, alpha: f64) -> Streak {
    Streak {
        from: Point::new(from.0, from.1),
        to: Point::new(to.0, to.1),
        width,
        alpha,
    }
}

#[test]
fn surface_starts_black_and_opaque() {
    let s = CpuStarSurface::new(Viewport::new(8, 4).unwrap()).unwrap();
    assert!(s.frame().data.chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
    assert_eq!(s.presented(), 0);
}

#[test]
fn oversized_surfaces_are_rejected() {
    let vp = Viewport::new(70_000, 10).unwrap();
    assert!(matches!(CpuStarSurface::new(vp), Err(CineError::Render(_))));
}

#[test]
fn streaks_are_painted_on_present() {
    let mut s = CpuStarSurface::new(Viewport::new(64, 40).unwrap()).unwrap();
    s.stroke(&streak((10.0, 20.0), (50.0, 20.0), 4.0, 1.0));
    assert_eq!(s.frame().pixel(30, 20), Some([0, 0, 0, 255]));

    s.present().unwrap();
    assert_eq!(s.presented(), 1);
    let on = s.frame().pixel(30, 20).unwrap();
    assert!(on[0] > 200 && on[3] == 255, "{on:?}");
    assert_eq!(s.frame().pixel(30, 35), Some([0, 0, 0, 255]));

    // Strokes are consumed by present.
    s.fade(1.0);
    s.present().unwrap();
    assert_eq!(s.frame().pixel(30, 20), Some([0, 0, 0, 255]));
}

#[test]
fn degenerate_streaks_draw_nothing() {
    assert!(streak_quad(&streak((5.0, 5.0), (5.0, 5.0), 4.0, 1.0)).is_none());
    assert!(streak_quad(&streak((5.0, 5.0), (9.0, 5.0), 0.0, 1.0)).is_none());
    assert!(streak_quad(&streak((5.0, 5.0), (9.0, 5.0), 2.0, 0.0)).is_none());
    assert!(streak_quad(&streak((5.0, 5.0), (9.0, 5.0), 2.0, 0.5)).is_some());
}

#[test]
fn fade_leaves_a_dimmer_trail() {
    let mut s = CpuStarSurface::new(Viewport::new(64, 40).unwrap()).unwrap();
    s.stroke(&streak((10.0, 20.0), (50.0, 20.0), 4.0, 1.0));
    s.present().unwrap();
    let before = s.frame().pixel(30, 20).unwrap()[0];
    s.fade(0.4);
    let after = s.frame().pixel(30, 20).unwrap()[0];
    assert!(after < before && after > 0);
}

#[test]
fn empty_surfaces_are_rejected() {
    let vp = Viewport {
        width: 0,
        height: 4,
    };
    assert!(matches!(CpuStarSurface::new(vp), Err(CineError::Validation(_))));
}
