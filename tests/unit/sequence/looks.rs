use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn still_is_identity() {
    assert_eq!(Motion::Still.sample(Millis(1234)), MotionSample::default());
}

#[test]
fn pulse_breathes_and_loops() {
    let m = Motion::Pulse {
        period: Millis(2_000),
        min: 0.5,
        max: 0.8,
    };
    assert!(close(m.sample(Millis(0)).opacity, 0.5));
    assert!(close(m.sample(Millis(1_000)).opacity, 0.8));
    assert!(close(m.sample(Millis(3_000)).opacity, 0.8));
    assert!(close(m.sample(Millis(4_000)).opacity, 0.5));
}

#[test]
fn shake_and_swing_are_horizontal() {
    let shake = Motion::Shake {
        period: Millis(200),
        amplitude_px: 10.0,
    };
    assert!(close(shake.sample(Millis(0)).offset.x, -10.0));
    assert!(close(shake.sample(Millis(50)).offset.x, 10.0));
    assert_eq!(shake.sample(Millis(50)).offset.y, 0.0);

    let swing = Motion::Swing {
        period: Millis(300),
        amplitude_px: 100.0,
    };
    assert!(close(swing.sample(Millis(100)).offset.x, 100.0));
    assert!(close(swing.sample(Millis(200)).offset.x, -100.0));
}

#[test]
fn sway_rotates_in_degrees() {
    let m = Motion::Sway {
        period: Millis(300),
        degrees: 5.0,
    };
    assert!(close(m.sample(Millis(100)).rotation_rad, 5f64.to_radians()));
    assert!(close(m.sample(Millis(200)).rotation_rad, -5f64.to_radians()));
}

#[test]
fn collapse_plays_once_and_holds() {
    let m = Motion::Collapse {
        duration: Millis(1_000),
        to_scale: 0.1,
        fade_out: true,
    };
    let start = m.sample(Millis(0));
    assert!(close(start.scale, 1.0));
    assert!(close(start.opacity, 1.0));
    let mid = m.sample(Millis(500));
    assert!(close(mid.scale, 0.55));
    let end = m.sample(Millis(1_000));
    assert!(close(end.scale, 0.1));
    assert!(close(end.opacity, 0.0));
    assert_eq!(m.sample(Millis(60_000)), end);
}

#[test]
fn zero_period_does_not_divide_by_zero() {
    let m = Motion::Flicker {
        period: Millis::ZERO,
        amplitude_px: 20.0,
    };
    let s = m.sample(Millis(77));
    assert!(close(s.opacity, 1.0));
    assert!(close(s.offset.x, 0.0));
}

#[test]
fn unknown_phase_falls_back_to_default_look() {
    let table = LookTable::disaster_preset();
    assert!(!table.contains("encore"));
    assert_eq!(table.resolve("encore"), PhaseLook::default());
    assert!(table.resolve("encore").visible);
}

#[test]
fn disaster_preset_assigns_particles_and_hides_the_terminal_phase() {
    let table = LookTable::disaster_preset();
    let particles: Vec<_> = [
        "ice", "quake", "fire", "flood", "tornado", "glitch", "void", "rebirth",
    ]
    .iter()
    .map(|p| table.resolve(p).particles)
    .collect();
    assert_eq!(
        particles,
        vec![
            Some(ParticleArchetype::Snow),
            Some(ParticleArchetype::Dust),
            Some(ParticleArchetype::Embers),
            None,
            Some(ParticleArchetype::Debris),
            None,
            None,
            None,
        ]
    );
    assert!(!table.resolve("complete").visible);
    assert_eq!(table.phases().count(), 9);
}

#[test]
fn looks_deserialize_with_defaults() {
    let json = r#"{
        "storm": {
            "background": {
                "color": [10, 20, 30, 40],
                "motion": { "kind": "sway", "period": 400, "degrees": 3.0 }
            },
            "title": { "opacity": 0.5 },
            "particles": "debris"
        },
        "done": { "visible": false }
    }"#;
    let table: LookTable = serde_json::from_str(json).unwrap();
    let storm = table.resolve("storm");
    assert!(storm.visible);
    let bg = storm.background.unwrap();
    assert!(!bg.vignette);
    assert_eq!(
        bg.motion,
        Motion::Sway {
            period: Millis(400),
            degrees: 3.0
        }
    );
    assert_eq!(storm.title.opacity, 0.5);
    assert_eq!(storm.title.scale, 1.0);
    assert_eq!(storm.particles, Some(ParticleArchetype::Debris));
    assert!(!table.resolve("done").visible);
}
