use std::{cell::Cell, rc::Rc};

use crate::{
    config::{CaptionCue, CaptionSample},
    effects::starfield::{StarSurface, StarfieldParams, StarfieldRenderer, WarpState},
    foundation::{core::Millis, error::CineResult},
    timing::{cancel::CancelToken, clock::Scheduled},
};

/// Navigation collaborator invoked when a warp finishes.
pub trait Navigator {
    /// Go to `destination`.
    fn navigate(&mut self, destination: &str);
}

impl<F: FnMut(&str)> Navigator for F {
    fn navigate(&mut self, destination: &str) {
        self(destination)
    }
}

/// Star-field transition with timed captions that hands off to a [`Navigator`].
///
/// The navigator is called exactly once, after the star-field completes. Cancelling, or
/// starting without a surface, means it is never called.
pub struct WarpTransition<S, N> {
    renderer: StarfieldRenderer<S>,
    captions: Vec<CaptionCue>,
    destination: String,
    navigator: N,
    started_at: Millis,
    finished: Rc<Cell<bool>>,
    navigated: bool,
}

impl<S: StarSurface, N: Navigator> WarpTransition<S, N> {
    /// Begin a warp toward `destination` at `now`.
    ///
    /// Fails when the star-field rejects `params` or the surface's viewport.
    pub fn start(
        surface: Option<S>,
        params: StarfieldParams,
        captions: Vec<CaptionCue>,
        destination: impl Into<String>,
        navigator: N,
        now: Millis,
        token: CancelToken,
    ) -> CineResult<Self> {
        let finished = Rc::new(Cell::new(false));
        let flag = finished.clone();
        let renderer = StarfieldRenderer::start(surface, params, now, token)?
            .with_on_complete(move || flag.set(true));
        let destination = destination.into();
        tracing::debug!(%destination, "warp transition started");
        Ok(Self {
            renderer,
            captions,
            destination,
            navigator,
            started_at: now,
            finished,
            navigated: false,
        })
    }

    /// Stop the warp. The navigator will not be called.
    pub fn cancel(&mut self) {
        self.renderer.cancel();
    }

    /// Star-field state.
    pub fn state(&self) -> WarpState {
        self.renderer.state()
    }

    /// Whether the navigator has been called.
    pub fn navigated(&self) -> bool {
        self.navigated
    }

    /// Destination handed to the navigator.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// The star-field driver.
    pub fn renderer(&self) -> &StarfieldRenderer<S> {
        &self.renderer
    }

    /// The navigation collaborator.
    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Caption reveal states at `now`.
    pub fn captions(&self, now: Millis) -> impl Iterator<Item = (&CaptionCue, CaptionSample)> + '_ {
        let since = now.since(self.started_at);
        self.captions.iter().map(move |c| (c, c.sample(since)))
    }

    /// Consume the transition, returning the surface and navigator.
    pub fn into_parts(self) -> (Option<S>, N) {
        (self.renderer.into_surface(), self.navigator)
    }
}

impl<S: StarSurface, N: Navigator> Scheduled for WarpTransition<S, N> {
    fn next_deadline(&self) -> Option<Millis> {
        self.renderer.next_deadline()
    }

    fn advance_to(&mut self, now: Millis) {
        self.renderer.advance_to(now);
        if self.finished.get() && !self.navigated {
            self.navigated = true;
            tracing::debug!(destination = %self.destination, "warp complete; navigating");
            self.navigator.navigate(&self.destination);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/warp.rs"]
mod tests;
