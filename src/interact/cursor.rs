use crate::{
    foundation::core::{Millis, Point, Vec2, Viewport},
    interact::regions::{ElementId, Hit, HitTester, RegionId},
};

/// Side length of the cursor visual.
pub const CURSOR_SIZE: f64 = 40.0;
/// Distance of the initial position from the right edge.
pub const CURSOR_INSET_RIGHT: f64 = 80.0;
/// Initial distance from the top edge.
pub const CURSOR_INSET_TOP: f64 = 40.0;
/// The hint stays hidden this long after mount.
pub const HINT_DELAY: Millis = Millis(2_000);
/// Fade-in length of the hint.
pub const HINT_FADE: Millis = Millis(200);

/// Onboarding hint state. Dismissal is permanent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HintState {
    /// Not yet interacted with.
    Shown,
    /// Dismissed by the first drag or pointer-down.
    Dismissed,
}

type HoverFn = Box<dyn FnMut(Option<RegionId>)>;

/// Draggable pointer that hit-tests tagged regions at its visual center.
pub struct InteractionCursor {
    pos: Point,
    own: ElementId,
    hint: HintState,
    hovered: Option<RegionId>,
    on_hover: HoverFn,
    scratch: Vec<Hit>,
}

impl InteractionCursor {
    /// Cursor near the top-right corner of `viewport`.
    pub fn new(
        viewport: Viewport,
        own: ElementId,
        on_hover: impl FnMut(Option<RegionId>) + 'static,
    ) -> Self {
        Self {
            pos: Point::new(viewport.w() - CURSOR_INSET_RIGHT, CURSOR_INSET_TOP),
            own,
            hint: HintState::Shown,
            hovered: None,
            on_hover: Box::new(on_hover),
            scratch: Vec::new(),
        }
    }

    /// Top-left corner of the visual.
    pub fn position(&self) -> Point {
        self.pos
    }

    /// Center of the visual; the hit-test point.
    pub fn center(&self) -> Point {
        self.pos + Vec2::new(CURSOR_SIZE / 2.0, CURSOR_SIZE / 2.0)
    }

    /// Element id the cursor itself occupies in the scene.
    pub fn element(&self) -> ElementId {
        self.own
    }

    /// Hint state.
    pub fn hint(&self) -> HintState {
        self.hint
    }

    /// Region reported by the most recent drag.
    pub fn hovered(&self) -> Option<RegionId> {
        self.hovered
    }

    /// Hint opacity `elapsed` after mount: hidden for [`HINT_DELAY`], then a linear
    /// fade-in over [`HINT_FADE`]. Always 0 once dismissed.
    pub fn hint_opacity(&self, elapsed: Millis) -> f64 {
        if self.hint == HintState::Dismissed || elapsed < HINT_DELAY {
            return 0.0;
        }
        let t = elapsed.since(HINT_DELAY).0 as f64 / HINT_FADE.0 as f64;
        t.min(1.0)
    }

    /// Touch start on the cursor.
    pub fn pointer_down(&mut self) {
        self.dismiss_hint();
    }

    fn dismiss_hint(&mut self) {
        if self.hint == HintState::Shown {
            tracing::debug!("cursor hint dismissed");
            self.hint = HintState::Dismissed;
        }
    }

    /// Move by `delta`, hit-test at the new center and report the topmost tagged
    /// region under it (or `None`). Reports on every call.
    pub fn drag_by(&mut self, delta: Vec2, scene: &impl HitTester) -> Option<RegionId> {
        self.dismiss_hint();
        self.pos += delta;

        self.scratch.clear();
        scene.hits_at(self.center(), &mut self.scratch);
        let own = self.own;
        let region = self
            .scratch
            .iter()
            .filter(|h| h.element != own)
            .find_map(|h| h.region);

        self.hovered = region;
        (self.on_hover)(region);
        region
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interact/cursor.rs"]
mod tests;
