use crate::{
    foundation::{
        core::{Fps, Millis, Point, Viewport},
        error::{CineError, CineResult},
        rng::Rng64,
    },
    timing::{cancel::CancelToken, clock::Scheduled},
};

/// Tunables of the warp simulation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StarfieldParams {
    /// Number of simulated stars.
    pub star_count: usize,
    /// Depth units every star travels per frame before acceleration.
    pub base_speed: f64,
    /// Warp-speed increment applied once per frame.
    pub warp_increment: f64,
    /// Alpha of the black fill laid over the previous frame (trail length).
    pub trail_fade: f64,
    /// Stroke width of a star at the near plane.
    pub max_stroke_px: f64,
    /// Wall-clock length of one run.
    pub duration: Millis,
    /// Display frame rate of the loop.
    pub fps: Fps,
    /// Seed for star placement.
    pub seed: u64,
}

impl Default for StarfieldParams {
    fn default() -> Self {
        Self {
            star_count: 500,
            base_speed: 0.2,
            warp_increment: 0.5,
            trail_fade: 0.4,
            max_stroke_px: 4.0,
            duration: Millis(3_500),
            fps: Fps::default(),
            seed: 0x5EED,
        }
    }
}

impl StarfieldParams {
    /// Reject parameters that would break the simulation invariants.
    pub fn validate(&self) -> CineResult<()> {
        if self.star_count == 0 {
            return Err(CineError::validation("star_count must be > 0"));
        }
        if !(self.base_speed.is_finite() && self.base_speed > 0.0) {
            return Err(CineError::validation("base_speed must be finite and > 0"));
        }
        if !(self.warp_increment.is_finite() && self.warp_increment >= 0.0) {
            return Err(CineError::validation("warp_increment must be finite and >= 0"));
        }
        if !(0.0..=1.0).contains(&self.trail_fade) {
            return Err(CineError::validation("trail_fade must be in [0, 1]"));
        }
        if !(self.max_stroke_px.is_finite() && self.max_stroke_px > 0.0) {
            return Err(CineError::validation("max_stroke_px must be finite and > 0"));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        Ok(())
    }
}

/// A point in camera space. `z` is the current depth, `pz` the depth one frame ago.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Star {
    /// Horizontal camera-space offset from the view axis.
    pub x: f64,
    /// Vertical camera-space offset from the view axis.
    pub y: f64,
    /// Current depth, in `(0, field_depth]`.
    pub z: f64,
    /// Depth at the previous frame.
    pub pz: f64,
}

/// One projected star segment ready to be stroked.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Streak {
    /// Projection of the previous depth.
    pub from: Point,
    /// Projection of the current depth.
    pub to: Point,
    /// Stroke width in pixels.
    pub width: f64,
    /// Stroke alpha in `[0, 1)`.
    pub alpha: f64,
}

/// Nearness in `[0, 1)`: `1 - z / field_depth`. Strictly decreasing in `z`.
pub fn streak_intensity(z: f64, field_depth: f64) -> f64 {
    (1.0 - z / field_depth).clamp(0.0, 1.0)
}

/// Perspective-project camera-space `(x, y)` at depth `z` onto `viewport`.
pub fn project(x: f64, y: f64, z: f64, viewport: Viewport) -> Point {
    let c = viewport.center();
    Point::new(x / z * viewport.w() + c.x, y / z * viewport.h() + c.y)
}

/// Pure warp simulation; independent of any drawing surface.
#[derive(Clone, Debug)]
pub struct StarField {
    stars: Vec<Star>,
    warp_speed: f64,
    field_depth: f64,
    viewport: Viewport,
    params: StarfieldParams,
    rng: Rng64,
}

impl StarField {
    /// Scatter `params.star_count` stars over `viewport`. The far plane equals the
    /// viewport width.
    ///
    /// Fails on an empty viewport or parameters rejected by [`StarfieldParams::validate`].
    pub fn new(viewport: Viewport, params: StarfieldParams) -> CineResult<Self> {
        let viewport = Viewport::new(viewport.width, viewport.height)?;
        params.validate()?;
        let mut rng = Rng64::new(params.seed);
        let field_depth = viewport.w();
        let stars = (0..params.star_count)
            .map(|_| {
                let (x, y) = random_xy(&mut rng, viewport);
                // 1 - [0, 1) keeps depth in (0, field_depth].
                let z = field_depth * (1.0 - rng.next_f64_01());
                let pz = field_depth * (1.0 - rng.next_f64_01());
                Star { x, y, z, pz }
            })
            .collect();
        Ok(Self {
            stars,
            warp_speed: 0.0,
            field_depth,
            viewport,
            params,
            rng,
        })
    }

    /// Current stars.
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Accumulated warp speed.
    pub fn warp_speed(&self) -> f64 {
        self.warp_speed
    }

    /// Depth of the far plane.
    pub fn field_depth(&self) -> f64 {
        self.field_depth
    }

    /// Viewport the field projects onto.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Advance one frame and emit one streak per star.
    pub fn step(&mut self, mut emit: impl FnMut(Streak)) {
        self.warp_speed += self.params.warp_increment;
        let travel = self.params.base_speed + self.warp_speed;

        for star in &mut self.stars {
            star.z -= travel;
            if star.z <= 0.0 {
                let (x, y) = random_xy(&mut self.rng, self.viewport);
                star.x = x;
                star.y = y;
                star.z = self.field_depth;
                star.pz = self.field_depth;
            }

            let to = project(star.x, star.y, star.z, self.viewport);
            let from = project(star.x, star.y, star.pz, self.viewport);
            star.pz = star.z;

            let nearness = streak_intensity(star.z, self.field_depth);
            emit(Streak {
                from,
                to,
                width: nearness * self.params.max_stroke_px,
                alpha: nearness,
            });
        }
    }
}

fn random_xy(rng: &mut Rng64, viewport: Viewport) -> (f64, f64) {
    let x = rng.next_f64_01() * viewport.w() - viewport.w() / 2.0;
    let y = rng.next_f64_01() * viewport.h() - viewport.h() / 2.0;
    (x, y)
}

/// Drawing surface the star-field renders onto.
pub trait StarSurface {
    /// Measured extent of the surface.
    fn viewport(&self) -> Viewport;

    /// Lay a black fill of opacity `alpha` over the previous contents.
    fn fade(&mut self, alpha: f64);

    /// Stroke one streak.
    fn stroke(&mut self, streak: &Streak);

    /// Called after every frame's strokes.
    fn present(&mut self) -> CineResult<()> {
        Ok(())
    }
}

/// Lifecycle of a [`StarfieldRenderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarpState {
    /// Frame loop registered.
    Running,
    /// Ran for the full duration; completion fired.
    Completed,
    /// Stopped through the cancellation token or [`StarfieldRenderer::cancel`].
    Cancelled,
    /// No drawable surface was available; nothing ran.
    Unavailable,
}

type CompleteFn = Box<dyn FnOnce()>;

/// Frame-loop driver for a [`StarField`].
///
/// Renders frame `k` at `started_at + fps.frame_time(k)` for every frame that starts
/// before `started_at + duration`, then releases the loop and fires completion once.
/// Cancellation through the token stops the loop without firing completion.
pub struct StarfieldRenderer<S> {
    surface: Option<S>,
    field: Option<StarField>,
    params: StarfieldParams,
    started_at: Millis,
    frame: u64,
    state: WarpState,
    token: CancelToken,
    on_complete: Option<CompleteFn>,
}

impl<S: StarSurface> StarfieldRenderer<S> {
    /// Register the frame loop at `now`. Without a surface the renderer is inert.
    ///
    /// Invalid parameters, or a surface reporting an empty viewport, are errors even
    /// when no surface is given.
    pub fn start(
        surface: Option<S>,
        params: StarfieldParams,
        now: Millis,
        token: CancelToken,
    ) -> CineResult<Self> {
        params.validate()?;
        let (field, state) = match surface.as_ref() {
            Some(s) => (Some(StarField::new(s.viewport(), params)?), WarpState::Running),
            None => {
                tracing::debug!("no drawable surface; warp star-field skipped");
                (None, WarpState::Unavailable)
            }
        };
        if state == WarpState::Running {
            tracing::debug!(
                stars = params.star_count,
                duration_ms = params.duration.0,
                "warp star-field started"
            );
        }
        Ok(Self {
            surface,
            field,
            params,
            started_at: now,
            frame: 0,
            state,
            token,
            on_complete: None,
        })
    }

    /// Callback fired exactly once when the run completes.
    pub fn with_on_complete(mut self, f: impl FnOnce() + 'static) -> Self {
        if self.state == WarpState::Running {
            self.on_complete = Some(Box::new(f));
        }
        self
    }

    /// Stop the loop now. Idempotent; completion will not fire.
    pub fn cancel(&mut self) {
        self.token.cancel();
        self.release(WarpState::Cancelled);
    }

    fn release(&mut self, state: WarpState) {
        if self.state != WarpState::Running {
            return;
        }
        self.state = state;
        self.on_complete = None;
        tracing::debug!(?state, frames = self.frame, "warp star-field stopped");
    }

    /// Lifecycle state.
    pub fn state(&self) -> WarpState {
        self.state
    }

    /// Whether the frame loop is still registered.
    pub fn is_running(&self) -> bool {
        self.state == WarpState::Running
    }

    /// Frames rendered so far.
    pub fn frames_rendered(&self) -> u64 {
        self.frame
    }

    /// Current warp speed (0 when nothing ran).
    pub fn warp_speed(&self) -> f64 {
        self.field.as_ref().map_or(0.0, StarField::warp_speed)
    }

    /// Current stars (empty when nothing ran).
    pub fn stars(&self) -> &[Star] {
        self.field.as_ref().map_or(&[], StarField::stars)
    }

    /// Simulation state, if a surface was available.
    pub fn field(&self) -> Option<&StarField> {
        self.field.as_ref()
    }

    /// Borrow the surface.
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Consume the renderer, returning its surface.
    pub fn into_surface(self) -> Option<S> {
        self.surface
    }

    /// Instant the run ends.
    pub fn deadline(&self) -> Millis {
        self.started_at + self.params.duration
    }

    fn next_frame_at(&self) -> Millis {
        self.started_at + self.params.fps.frame_time(self.frame)
    }

    fn render_frame(&mut self) {
        let (Some(surface), Some(field)) = (self.surface.as_mut(), self.field.as_mut()) else {
            return;
        };
        surface.fade(self.params.trail_fade);
        field.step(|streak| surface.stroke(&streak));
        if let Err(err) = surface.present() {
            tracing::warn!(error = %err, frame = self.frame, "star-field present failed");
        }
        self.frame += 1;
    }
}

impl<S: StarSurface> Scheduled for StarfieldRenderer<S> {
    fn next_deadline(&self) -> Option<Millis> {
        if self.state != WarpState::Running {
            return None;
        }
        Some(self.next_frame_at().min(self.deadline()))
    }

    fn advance_to(&mut self, now: Millis) {
        while self.state == WarpState::Running {
            if self.token.is_cancelled() {
                self.release(WarpState::Cancelled);
                return;
            }
            let frame_at = self.next_frame_at();
            let deadline = self.deadline();
            if frame_at < deadline {
                if frame_at > now {
                    return;
                }
                self.render_frame();
            } else {
                if deadline > now {
                    return;
                }
                let done = self.on_complete.take();
                self.release(WarpState::Completed);
                if let Some(f) = done {
                    f();
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/starfield.rs"]
mod tests;
