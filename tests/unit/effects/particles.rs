use super::*;

fn vp() -> Viewport {
    Viewport::new(1280, 720).unwrap()
}

#[test]
fn generation_is_deferred_until_surface_ready() {
    let mut overlay = ParticleOverlay::new(ParticleArchetype::Snow, 1, Millis(0));
    assert!(!overlay.is_ready());
    assert!(overlay.particles().is_empty());
    assert_eq!(overlay.samples(Millis(5_000)).count(), 0);

    assert!(overlay.surface_ready(vp()));
    assert_eq!(overlay.particles().len(), 30);

    let first = overlay.particles().to_vec();
    assert!(!overlay.surface_ready(Viewport::new(10, 10).unwrap()));
    assert_eq!(overlay.particles(), first.as_slice());
}

#[test]
fn particles_are_placed_inside_the_viewport_with_bounded_timing() {
    for archetype in [
        ParticleArchetype::Snow,
        ParticleArchetype::Embers,
        ParticleArchetype::Dust,
        ParticleArchetype::Debris,
    ] {
        let mut overlay = ParticleOverlay::new(archetype, 42, Millis(0));
        overlay.surface_ready(vp());
        let n = overlay.particles().len();
        assert!((20..=30).contains(&n), "{archetype:?} count {n}");
        for p in overlay.particles() {
            assert!((0.0..1280.0).contains(&p.origin.x));
            assert!((0.0..720.0).contains(&p.origin.y));
            assert!((500..=1500).contains(&p.cycle.0));
            assert!(p.delay.0 <= 2000);
        }
    }
}

#[test]
fn debris_blows_both_ways_and_snow_falls() {
    let mut debris = ParticleOverlay::new(ParticleArchetype::Debris, 3, Millis(0));
    debris.surface_ready(vp());
    assert!(debris.particles().iter().any(|p| p.travel.x > 0.0));
    assert!(debris.particles().iter().any(|p| p.travel.x < 0.0));
    assert!(debris.particles().iter().all(|p| p.travel.y == 0.0));

    let mut snow = ParticleOverlay::new(ParticleArchetype::Snow, 3, Millis(0));
    snow.surface_ready(vp());
    assert!(snow.particles().iter().all(|p| p.travel.y > 0.0));
}

#[test]
fn sample_loops_forever_after_delay() {
    let p = Particle {
        origin: Point::new(10.0, 20.0),
        travel: Vec2::new(0.0, 1000.0),
        cycle: Millis(1000),
        delay: Millis(500),
        archetype: ParticleArchetype::Snow,
    };
    assert_eq!(p.sample(Millis(499)), None);

    let start = p.sample(Millis(500)).unwrap();
    assert_eq!(start.pos, Point::new(10.0, 20.0));
    assert_eq!(start.opacity, 0.0);

    let mid = p.sample(Millis(1000)).unwrap();
    assert!((mid.pos.y - 520.0).abs() < 1e-9);
    assert!((mid.opacity - 1.0).abs() < 1e-9);

    let later = p.sample(Millis(1000 + 1000 * 57)).unwrap();
    assert_eq!(later, mid);
}

#[test]
fn samples_are_relative_to_mount_time() {
    let mut overlay = ParticleOverlay::new(ParticleArchetype::Embers, 9, Millis(10_000));
    overlay.surface_ready(vp());
    assert_eq!(overlay.samples(Millis(10_000)).filter(|(_, s)| s.opacity > 0.0).count(), 0);
    assert!(overlay.samples(Millis(13_000)).count() == overlay.particles().len());
}
