use std::collections::BTreeMap;

use crate::{
    effects::particles::ParticleArchetype,
    foundation::{
        core::{Millis, Vec2},
        ease::{Ease, sample_keys},
    },
};

/// Procedural motion applied to a layer while its phase is active.
///
/// Looping motions repeat every `period`; [`Motion::Collapse`] plays once and holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Motion {
    /// No motion.
    #[default]
    Still,
    /// Opacity breathes `min -> max -> min`.
    Pulse {
        /// Loop length.
        period: Millis,
        /// Lowest opacity.
        min: f64,
        /// Highest opacity.
        max: f64,
    },
    /// Horizontal jitter that decays within each loop.
    Shake {
        /// Loop length.
        period: Millis,
        /// Peak horizontal offset.
        amplitude_px: f64,
    },
    /// Horizontal swing out to both sides.
    Swing {
        /// Loop length.
        period: Millis,
        /// Peak horizontal offset.
        amplitude_px: f64,
    },
    /// Rotation out to both sides.
    Sway {
        /// Loop length.
        period: Millis,
        /// Peak rotation.
        degrees: f64,
    },
    /// Opacity drop-outs with a horizontal split.
    Flicker {
        /// Loop length.
        period: Millis,
        /// Peak horizontal offset.
        amplitude_px: f64,
    },
    /// One-shot shrink toward `to_scale`, optionally fading out.
    Collapse {
        /// Shrink duration.
        duration: Millis,
        /// Final scale.
        to_scale: f64,
        /// Whether opacity falls to 0 alongside.
        fade_out: bool,
    },
}

/// Transform and opacity contributed by a [`Motion`] at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSample {
    /// Translation in pixels.
    pub offset: Vec2,
    /// Uniform scale about the layer center.
    pub scale: f64,
    /// Rotation about the layer center.
    pub rotation_rad: f64,
    /// Opacity multiplier.
    pub opacity: f64,
}

impl Default for MotionSample {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
            rotation_rad: 0.0,
            opacity: 1.0,
        }
    }
}

fn loop_progress(period: Millis, t: Millis) -> f64 {
    if period == Millis::ZERO {
        return 0.0;
    }
    (t.0 % period.0) as f64 / period.0 as f64
}

impl Motion {
    /// Sample `since_entry` after the phase became active.
    pub fn sample(self, since_entry: Millis) -> MotionSample {
        let mut out = MotionSample::default();
        match self {
            Self::Still => {}
            Self::Pulse { period, min, max } => {
                out.opacity = sample_keys(&[min, max, min], loop_progress(period, since_entry));
            }
            Self::Shake {
                period,
                amplitude_px,
            } => {
                let u = loop_progress(period, since_entry);
                out.offset.x = amplitude_px * sample_keys(&[-1.0, 1.0, -0.5, 0.5, 0.0], u);
            }
            Self::Swing {
                period,
                amplitude_px,
            } => {
                let u = loop_progress(period, since_entry);
                out.offset.x = amplitude_px * sample_keys(&[0.0, 1.0, -1.0, 0.0], u);
            }
            Self::Sway { period, degrees } => {
                let u = loop_progress(period, since_entry);
                out.rotation_rad = degrees.to_radians() * sample_keys(&[0.0, 1.0, -1.0, 0.0], u);
            }
            Self::Flicker {
                period,
                amplitude_px,
            } => {
                let u = loop_progress(period, since_entry);
                out.opacity = sample_keys(&[1.0, 0.0, 1.0, 0.5, 1.0], u);
                out.offset.x = amplitude_px * sample_keys(&[0.0, -1.0, 1.0, 0.0], u);
            }
            Self::Collapse {
                duration,
                to_scale,
                fade_out,
            } => {
                let t = if duration == Millis::ZERO {
                    1.0
                } else {
                    since_entry.0 as f64 / duration.0 as f64
                };
                let e = Ease::InOutCubic.apply(t);
                out.scale = 1.0 + (to_scale - 1.0) * e;
                if fade_out {
                    out.opacity = 1.0 - e;
                }
            }
        }
        out
    }
}

/// Full-screen tint behind the title.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BackgroundLook {
    /// Straight-alpha RGBA tint.
    pub color: [u8; 4],
    /// Darken the edges toward black.
    #[serde(default)]
    pub vignette: bool,
    /// Motion of the tint layer.
    #[serde(default)]
    pub motion: Motion,
}

/// Styling of the title block.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TitleLook {
    /// Straight-alpha RGBA fill.
    pub color: [u8; 4],
    /// Base opacity before motion.
    pub opacity: f64,
    /// Gaussian blur radius in pixels (0 = sharp).
    pub blur_px: f64,
    /// Base scale before motion.
    pub scale: f64,
    /// Motion of the title.
    pub motion: Motion,
}

impl Default for TitleLook {
    fn default() -> Self {
        Self {
            color: [255, 255, 255, 255],
            opacity: 1.0,
            blur_px: 0.0,
            scale: 1.0,
            motion: Motion::Still,
        }
    }
}

/// Visual configuration selected by one phase.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PhaseLook {
    /// Whether the intro overlay is drawn at all.
    pub visible: bool,
    /// Background tint, if any.
    pub background: Option<BackgroundLook>,
    /// Title styling.
    pub title: TitleLook,
    /// Particle overlay mounted while the phase is active.
    pub particles: Option<ParticleArchetype>,
}

impl Default for PhaseLook {
    fn default() -> Self {
        Self {
            visible: true,
            background: None,
            title: TitleLook::default(),
            particles: None,
        }
    }
}

/// Phase label to [`PhaseLook`] lookup. Unknown labels resolve to the default look.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LookTable {
    looks: BTreeMap<String, PhaseLook>,
}

impl LookTable {
    /// Table over explicit entries.
    pub fn new(looks: BTreeMap<String, PhaseLook>) -> Self {
        Self { looks }
    }

    /// Look for `phase`.
    pub fn resolve(&self, phase: &str) -> PhaseLook {
        self.looks.get(phase).copied().unwrap_or_default()
    }

    /// Whether `phase` has an explicit entry.
    pub fn contains(&self, phase: &str) -> bool {
        self.looks.contains_key(phase)
    }

    /// Explicitly configured phase labels.
    pub fn phases(&self) -> impl Iterator<Item = &str> {
        self.looks.keys().map(String::as_str)
    }

    /// Insert or replace one entry.
    pub fn insert(&mut self, phase: impl Into<String>, look: PhaseLook) {
        self.looks.insert(phase.into(), look);
    }

    /// Looks of the eight-phase disaster intro.
    pub fn disaster_preset() -> Self {
        let ms = Millis;
        let bg = |color, motion| {
            Some(BackgroundLook {
                color,
                vignette: false,
                motion,
            })
        };
        let title = |color, motion| TitleLook {
            color,
            motion,
            ..TitleLook::default()
        };

        let mut t = Self::default();
        t.insert(
            "ice",
            PhaseLook {
                background: bg(
                    [23, 37, 84, 102],
                    Motion::Pulse {
                        period: ms(2_000),
                        min: 0.5,
                        max: 0.8,
                    },
                ),
                title: title([165, 243, 252, 255], Motion::Still),
                particles: Some(ParticleArchetype::Snow),
                ..PhaseLook::default()
            },
        );
        t.insert(
            "quake",
            PhaseLook {
                background: bg(
                    [28, 25, 23, 128],
                    Motion::Shake {
                        period: ms(200),
                        amplitude_px: 10.0,
                    },
                ),
                title: TitleLook {
                    blur_px: 0.5,
                    ..title(
                        [120, 53, 15, 255],
                        Motion::Shake {
                            period: ms(100),
                            amplitude_px: 5.0,
                        },
                    )
                },
                particles: Some(ParticleArchetype::Dust),
                ..PhaseLook::default()
            },
        );
        t.insert(
            "fire",
            PhaseLook {
                background: Some(BackgroundLook {
                    color: [220, 38, 38, 51],
                    vignette: true,
                    motion: Motion::Still,
                }),
                title: TitleLook {
                    scale: 1.05,
                    ..title([239, 68, 68, 255], Motion::Still)
                },
                particles: Some(ParticleArchetype::Embers),
                ..PhaseLook::default()
            },
        );
        t.insert(
            "flood",
            PhaseLook {
                background: bg([22, 78, 99, 77], Motion::Still),
                title: TitleLook {
                    opacity: 0.8,
                    ..title([6, 182, 212, 255], Motion::Still)
                },
                ..PhaseLook::default()
            },
        );
        t.insert(
            "tornado",
            PhaseLook {
                background: bg(
                    [30, 41, 59, 51],
                    Motion::Sway {
                        period: ms(500),
                        degrees: 5.0,
                    },
                ),
                title: TitleLook {
                    opacity: 0.6,
                    blur_px: 4.0,
                    ..title(
                        [148, 163, 184, 255],
                        Motion::Swing {
                            period: ms(100),
                            amplitude_px: 100.0,
                        },
                    )
                },
                particles: Some(ParticleArchetype::Debris),
                ..PhaseLook::default()
            },
        );
        t.insert(
            "glitch",
            PhaseLook {
                background: bg(
                    [0, 0, 0, 51],
                    Motion::Pulse {
                        period: ms(2_000),
                        min: 0.5,
                        max: 1.0,
                    },
                ),
                title: title(
                    [34, 197, 94, 255],
                    Motion::Flicker {
                        period: ms(100),
                        amplitude_px: 20.0,
                    },
                ),
                ..PhaseLook::default()
            },
        );
        t.insert(
            "void",
            PhaseLook {
                background: bg(
                    [0, 0, 0, 255],
                    Motion::Collapse {
                        duration: ms(1_000),
                        to_scale: 0.1,
                        fade_out: false,
                    },
                ),
                title: title(
                    [255, 255, 255, 255],
                    Motion::Collapse {
                        duration: ms(1_000),
                        to_scale: 0.0,
                        fade_out: true,
                    },
                ),
                ..PhaseLook::default()
            },
        );
        t.insert(
            "rebirth",
            PhaseLook {
                title: title([241, 245, 249, 255], Motion::Still),
                ..PhaseLook::default()
            },
        );
        t.insert(
            "complete",
            PhaseLook {
                visible: false,
                ..PhaseLook::default()
            },
        );
        t
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/looks.rs"]
mod tests;
