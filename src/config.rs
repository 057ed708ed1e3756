use std::path::Path;

use anyhow::Context as _;

use crate::{
    effects::starfield::StarfieldParams,
    foundation::{
        core::{Fps, Millis, Viewport},
        ease::Ease,
        error::{CineError, CineResult},
    },
    sequence::{
        looks::LookTable,
        timeline::{Timeline, TimelineEntry},
    },
};

/// Caption revealed over the warp star-field.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptionCue {
    /// Caption text.
    pub text: String,
    /// Delay after the warp starts.
    pub delay: Millis,
    /// Length of the reveal.
    #[serde(default = "CaptionCue::default_fade")]
    pub fade: Millis,
    /// Vertical distance the caption rises while revealing.
    #[serde(default)]
    pub rise_px: f64,
    /// Scale the caption grows from.
    #[serde(default = "CaptionCue::default_from_scale")]
    pub from_scale: f64,
    /// Blur radius the caption sharpens from.
    #[serde(default)]
    pub from_blur_px: f64,
}

/// State of a caption at one instant of a warp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptionSample {
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Downward offset from the resting position.
    pub offset_y: f64,
    /// Current scale.
    pub scale: f64,
    /// Current blur radius.
    pub blur_px: f64,
}

impl CaptionCue {
    fn default_fade() -> Millis {
        Millis(300)
    }

    fn default_from_scale() -> f64 {
        1.0
    }

    /// Plain fade-in cue.
    pub fn new(text: impl Into<String>, delay: Millis) -> Self {
        Self {
            text: text.into(),
            delay,
            fade: Self::default_fade(),
            rise_px: 0.0,
            from_scale: 1.0,
            from_blur_px: 0.0,
        }
    }

    /// Reveal progress `since_start` after the warp began.
    pub fn sample(&self, since_start: Millis) -> CaptionSample {
        let t = if since_start < self.delay {
            0.0
        } else if self.fade == Millis::ZERO {
            1.0
        } else {
            since_start.since(self.delay).0 as f64 / self.fade.0 as f64
        };
        let e = Ease::OutCubic.apply(t);
        CaptionSample {
            opacity: e,
            offset_y: self.rise_px * (1.0 - e),
            scale: self.from_scale + (1.0 - self.from_scale) * e,
            blur_px: self.from_blur_px * (1.0 - e),
        }
    }
}

/// Everything an intro and its warp transition need, loadable from JSON.
///
/// Missing fields fall back to [`IntroConfig::default`], the eight-phase disaster intro.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    /// Surface extent used for offline rendering.
    pub viewport: Viewport,
    /// Frame rate for offline rendering and the warp loop.
    pub fps: Fps,
    /// Seed for particle placement.
    pub seed: u64,
    /// Image references preloaded before the sequence starts.
    pub assets: Vec<String>,
    /// Upper bound on the preload wait.
    pub preload_timeout: Millis,
    /// Ordered phases; the last one is terminal.
    pub timeline: Timeline,
    /// Per-phase visuals.
    pub looks: LookTable,
    /// Title lines shown during the intro.
    pub title: Vec<String>,
    /// Warp star-field tunables.
    pub warp: StarfieldParams,
    /// Captions revealed during the warp.
    pub captions: Vec<CaptionCue>,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport {
                width: 1280,
                height: 720,
            },
            fps: Fps::default(),
            seed: 0x1D7_0C0DE,
            assets: Vec::new(),
            preload_timeout: Millis(5_000),
            timeline: disaster_timeline(),
            looks: LookTable::disaster_preset(),
            title: ["PROMPTED", "BY", "HARSHAL"].map(String::from).to_vec(),
            warp: StarfieldParams::default(),
            captions: vec![
                CaptionCue {
                    fade: Millis(500),
                    from_scale: 0.8,
                    from_blur_px: 10.0,
                    ..CaptionCue::new("MADE BY ANTIGRAVITY", Millis(500))
                },
                CaptionCue {
                    rise_px: 20.0,
                    ..CaptionCue::new("POWERED BY NEXT.JS", Millis(1_200))
                },
            ],
        }
    }
}

/// Phase offsets of the disaster intro.
pub fn disaster_timeline() -> Timeline {
    let entries = [
        ("ice", 0),
        ("quake", 3_000),
        ("fire", 6_000),
        ("flood", 9_000),
        ("tornado", 12_000),
        ("glitch", 15_000),
        ("void", 18_000),
        ("rebirth", 20_000),
        ("complete", 23_000),
    ]
    .map(|(phase, at)| TimelineEntry::new(phase, Millis(at)));
    // Offsets start at 0, strictly increase and labels are unique.
    Timeline::from_checked(entries.to_vec())
}

impl IntroConfig {
    /// Check cross-field constraints a deserializer cannot.
    pub fn validate(&self) -> CineResult<()> {
        Viewport::new(self.viewport.width, self.viewport.height)?;
        Fps::new(self.fps.num, self.fps.den)?;
        self.warp.validate()?;

        for (i, reference) in self.assets.iter().enumerate() {
            if reference.trim().is_empty() {
                return Err(CineError::config(format!("asset #{i} has an empty reference")));
            }
        }
        for phase in self.looks.phases() {
            if self.timeline.index_of(phase).is_none() {
                return Err(CineError::config(format!(
                    "look for phase '{phase}' does not match any timeline phase"
                )));
            }
        }
        for cue in &self.captions {
            if cue.text.trim().is_empty() {
                return Err(CineError::config("caption text must be non-empty"));
            }
            if !(cue.from_scale.is_finite() && cue.from_scale >= 0.0) {
                return Err(CineError::config(format!(
                    "caption '{}' has an invalid from_scale",
                    cue.text
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> CineResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON file.
    #[tracing::instrument(fields(path = %path.display()))]
    pub fn from_path(path: &Path) -> CineResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read intro config '{}'", path.display()))?;
        let cfg = Self::from_json_str(&text)?;
        tracing::debug!(
            phases = cfg.timeline.len(),
            assets = cfg.assets.len(),
            "intro config loaded"
        );
        Ok(cfg)
    }

    /// Serialize as pretty JSON.
    pub fn to_json_pretty(&self) -> CineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
