/// Easing curves applied to normalized progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Identity.
    #[default]
    Linear,
    /// Quadratic ease-in-out.
    InOutQuad,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in-out.
    InOutCubic,
}

impl Ease {
    /// Map `t` (clamped to `[0, 1]`) through the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }
}

/// Sample evenly spaced keyframe values at progress `u` in `[0, 1]` with linear
/// interpolation between neighbours.
pub fn sample_keys(keys: &[f64], u: f64) -> f64 {
    match keys {
        [] => 0.0,
        [only] => *only,
        _ => {
            let span = (keys.len() - 1) as f64;
            let x = u.clamp(0.0, 1.0) * span;
            let i = (x.floor() as usize).min(keys.len() - 2);
            let t = x - i as f64;
            keys[i] + (keys[i + 1] - keys[i]) * t
        }
    }
}
