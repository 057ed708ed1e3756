use crate::foundation::{
    core::{Millis, Point, Vec2, Viewport},
    ease::sample_keys,
    rng::Rng64,
};

/// Visual class of an overlay's particles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleArchetype {
    /// Small white flakes falling.
    Snow,
    /// Orange sparks rising.
    Embers,
    /// Large stone-colored grains with a short fall.
    Dust,
    /// Flat gray shards blown sideways.
    Debris,
}

/// Velocity field, color and size shared by every particle of an archetype.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArchetypeStyle {
    /// Straight-alpha RGBA color.
    pub color: [u8; 4],
    /// Particle size in pixels.
    pub size: Vec2,
    /// Displacement covered over one loop cycle.
    pub travel: Vec2,
    /// Whether the horizontal travel direction is picked at random per particle.
    pub random_x_direction: bool,
    /// Number of particles an overlay generates.
    pub count: usize,
}

impl ParticleArchetype {
    /// Style record for this archetype.
    pub fn style(self) -> ArchetypeStyle {
        match self {
            Self::Snow => ArchetypeStyle {
                color: [255, 255, 255, 153],
                size: Vec2::new(4.0, 4.0),
                travel: Vec2::new(0.0, 1000.0),
                random_x_direction: false,
                count: 30,
            },
            Self::Embers => ArchetypeStyle {
                color: [249, 115, 22, 153],
                size: Vec2::new(8.0, 8.0),
                travel: Vec2::new(0.0, -1000.0),
                random_x_direction: false,
                count: 30,
            },
            Self::Dust => ArchetypeStyle {
                color: [120, 113, 108, 153],
                size: Vec2::new(12.0, 12.0),
                travel: Vec2::new(0.0, 100.0),
                random_x_direction: false,
                count: 24,
            },
            Self::Debris => ArchetypeStyle {
                color: [156, 163, 175, 153],
                size: Vec2::new(16.0, 4.0),
                travel: Vec2::new(1000.0, 0.0),
                random_x_direction: true,
                count: 20,
            },
        }
    }
}

/// One decorative particle. Independent of every other particle.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Particle {
    /// Position at the start of each cycle.
    pub origin: Point,
    /// Displacement covered over one cycle.
    pub travel: Vec2,
    /// Length of one loop cycle.
    pub cycle: Millis,
    /// Delay after mount before the first cycle starts.
    pub delay: Millis,
    /// Visual class.
    pub archetype: ParticleArchetype,
}

/// Where and how visible a particle is at a given instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSample {
    /// Current position.
    pub pos: Point,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Rotation in radians; one full turn per cycle.
    pub rotation_rad: f64,
}

impl Particle {
    /// Sample the infinite loop `since_mount` after the overlay mounted.
    ///
    /// Returns `None` while the particle is still waiting out its start delay.
    pub fn sample(&self, since_mount: Millis) -> Option<ParticleSample> {
        if since_mount < self.delay || self.cycle == Millis::ZERO {
            return None;
        }
        let local = (since_mount - self.delay).0 % self.cycle.0;
        let u = local as f64 / self.cycle.0 as f64;
        Some(ParticleSample {
            pos: self.origin + self.travel * u,
            opacity: sample_keys(&[0.0, 1.0, 0.0], u),
            rotation_rad: std::f64::consts::TAU * u,
        })
    }
}

/// Particle layer mounted for one phase.
///
/// Descriptors are generated on the first [`ParticleOverlay::surface_ready`] call, once
/// the viewport has been measured; later measurements do not regenerate them.
#[derive(Clone, Debug)]
pub struct ParticleOverlay {
    archetype: ParticleArchetype,
    rng: Rng64,
    mounted_at: Millis,
    viewport: Option<Viewport>,
    particles: Vec<Particle>,
}

impl ParticleOverlay {
    /// Mount an overlay at `mounted_at`. No particles exist until the surface is ready.
    pub fn new(archetype: ParticleArchetype, seed: u64, mounted_at: Millis) -> Self {
        Self {
            archetype,
            rng: Rng64::new(seed),
            mounted_at,
            viewport: None,
            particles: Vec::new(),
        }
    }

    /// Report the measured viewport. Returns `true` if this call generated the particles.
    pub fn surface_ready(&mut self, viewport: Viewport) -> bool {
        if self.viewport.is_some() {
            return false;
        }
        self.viewport = Some(viewport);

        let style = self.archetype.style();
        self.particles = (0..style.count)
            .map(|_| {
                let origin = Point::new(
                    self.rng.range_f64(0.0, viewport.w()),
                    self.rng.range_f64(0.0, viewport.h()),
                );
                let cycle = Millis::from_secs_f64(self.rng.range_f64(0.5, 1.5));
                let delay = Millis::from_secs_f64(self.rng.range_f64(0.0, 2.0));
                let mut travel = style.travel;
                if style.random_x_direction && self.rng.coin() {
                    travel.x = -travel.x;
                }
                Particle {
                    origin,
                    travel,
                    cycle,
                    delay,
                    archetype: self.archetype,
                }
            })
            .collect();
        tracing::debug!(
            archetype = ?self.archetype,
            count = self.particles.len(),
            width = viewport.width,
            height = viewport.height,
            "particles generated"
        );
        true
    }

    /// Whether descriptors have been generated.
    pub fn is_ready(&self) -> bool {
        self.viewport.is_some()
    }

    /// Archetype of this overlay.
    pub fn archetype(&self) -> ParticleArchetype {
        self.archetype
    }

    /// Mount instant.
    pub fn mounted_at(&self) -> Millis {
        self.mounted_at
    }

    /// Generated descriptors (empty before the surface is ready).
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Visible particle samples at clock time `now`.
    pub fn samples(&self, now: Millis) -> impl Iterator<Item = (&Particle, ParticleSample)> + '_ {
        let since = now.since(self.mounted_at);
        self.particles
            .iter()
            .filter_map(move |p| p.sample(since).map(|s| (p, s)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/particles.rs"]
mod tests;
