use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::{
    assets::{
        fetch::AssetFetcher,
        preload::{AssetPreloader, PreloadReport},
    },
    config::IntroConfig,
    effects::particles::{ParticleArchetype, ParticleOverlay, ParticleSample},
    foundation::{
        core::{Millis, Viewport},
        rng::Rng64,
    },
    sequence::{
        looks::{LookTable, MotionSample, PhaseLook},
        sequencer::{PhaseChange, PhaseSequencer, SequencerState},
        timeline::Timeline,
    },
    timing::clock::Scheduled,
};

/// Coarse stage of an [`IntroSequence`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntroStage {
    /// Waiting on the preloader.
    Preloading,
    /// Phases are playing.
    Playing,
    /// Terminal phase reached; completion fired.
    Complete,
    /// Torn down before completion.
    Disposed,
}

/// Everything needed to paint one intro frame.
#[derive(Clone, Debug, PartialEq)]
pub struct IntroFrame {
    /// Clock time of the snapshot.
    pub at: Millis,
    /// Coarse stage.
    pub stage: IntroStage,
    /// Active phase label (`None` while preloading).
    pub phase: Option<String>,
    /// Time since the active phase was entered.
    pub since_phase: Millis,
    /// Look of the active phase.
    pub look: PhaseLook,
    /// Background motion at `at`.
    pub background: MotionSample,
    /// Title motion at `at`.
    pub title: MotionSample,
    /// Visible particles of the active overlay.
    pub particles: Vec<ParticleSample>,
    /// Archetype of the active overlay.
    pub archetype: Option<ParticleArchetype>,
    /// References settled / requested while preloading.
    pub progress: (usize, usize),
}

impl IntroFrame {
    /// Whether the intro overlay covers the page in this frame.
    pub fn covers_page(&self) -> bool {
        match self.stage {
            IntroStage::Preloading => true,
            IntroStage::Playing => self.look.visible,
            IntroStage::Complete | IntroStage::Disposed => false,
        }
    }
}

type CompleteFn = Box<dyn FnOnce(Millis)>;

/// Preloader, phase sequencer, look table and particle overlays wired together.
///
/// The preloader's ready signal starts the sequencer with the ready instant as epoch.
/// Each phase change resolves the phase's look once and swaps the particle overlay.
pub struct IntroSequence<F> {
    preloader: AssetPreloader<F>,
    ready_at: Rc<Cell<Option<Millis>>>,
    timeline: Timeline,
    looks: LookTable,
    sequencer: Option<PhaseSequencer>,
    changes: Rc<RefCell<Vec<PhaseChange>>>,
    completed_at: Rc<Cell<Option<Millis>>>,
    on_complete: Rc<RefCell<Option<CompleteFn>>>,
    look: PhaseLook,
    phase_index: usize,
    entered_at: Millis,
    overlay: Option<ParticleOverlay>,
    viewport: Option<Viewport>,
    rng: Rng64,
    disposed: bool,
}

impl<F: AssetFetcher> IntroSequence<F> {
    /// Start preloading `config.assets` at `now`.
    pub fn start(config: &IntroConfig, fetcher: F, now: Millis) -> Self {
        let ready_at = Rc::new(Cell::new(None));
        let gate = ready_at.clone();
        let preloader = AssetPreloader::start(
            config.assets.iter().cloned(),
            config.preload_timeout,
            now,
            fetcher,
        )
        .with_on_ready(move |report: &PreloadReport| gate.set(Some(report.at)));

        let mut out = Self {
            preloader,
            ready_at,
            timeline: config.timeline.clone(),
            looks: config.looks.clone(),
            sequencer: None,
            changes: Rc::new(RefCell::new(Vec::new())),
            completed_at: Rc::new(Cell::new(None)),
            on_complete: Rc::new(RefCell::new(None)),
            look: PhaseLook::default(),
            phase_index: 0,
            entered_at: now,
            overlay: None,
            viewport: None,
            rng: Rng64::new(config.seed),
            disposed: false,
        };
        out.open_gate();
        out
    }

    /// Callback fired exactly once when the terminal phase is entered.
    pub fn with_on_complete(self, f: impl FnOnce(Millis) + 'static) -> Self {
        if !self.disposed {
            match self.completed_at.get() {
                Some(at) => f(at),
                None => *self.on_complete.borrow_mut() = Some(Box::new(f)),
            }
        }
        self
    }

    /// Report the measured viewport; particle generation waits for it.
    pub fn surface_ready(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.surface_ready(viewport);
        }
    }

    fn open_gate(&mut self) {
        if self.sequencer.is_some() || self.disposed {
            return;
        }
        let Some(epoch) = self.ready_at.get() else {
            return;
        };

        let changes = self.changes.clone();
        let completed_at = self.completed_at.clone();
        let on_complete = self.on_complete.clone();
        let sequencer = PhaseSequencer::start(self.timeline.clone(), epoch)
            .with_on_phase(move |change| changes.borrow_mut().push(change.clone()))
            .with_on_complete(move |at| {
                completed_at.set(Some(at));
                if let Some(f) = on_complete.borrow_mut().take() {
                    f(at);
                }
            });
        self.sequencer = Some(sequencer);
        self.enter_phase(0, epoch);
    }

    fn enter_phase(&mut self, index: usize, at: Millis) {
        let phase = &self.timeline.entries()[index].phase;
        self.look = self.looks.resolve(phase);
        self.phase_index = index;
        self.entered_at = at;

        // The previous phase's overlay is torn down on exit.
        self.overlay = self.look.particles.map(|archetype| {
            let seed = self.rng.fork(index as u64).next_u64();
            let mut overlay = ParticleOverlay::new(archetype, seed, at);
            if let Some(vp) = self.viewport {
                overlay.surface_ready(vp);
            }
            overlay
        });
        tracing::debug!(
            phase = %phase,
            visible = self.look.visible,
            particles = ?self.look.particles,
            "phase look applied"
        );
    }

    fn apply_changes(&mut self) {
        let pending = std::mem::take(&mut *self.changes.borrow_mut());
        for change in pending {
            self.enter_phase(change.to, change.applied);
        }
    }

    /// Tear everything down. Pending timers are revoked and no callback runs afterwards.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.preloader.dispose();
        if let Some(seq) = self.sequencer.as_mut() {
            seq.dispose();
        }
        self.on_complete.borrow_mut().take();
        self.overlay = None;
    }

    /// Coarse stage.
    pub fn stage(&self) -> IntroStage {
        if self.disposed {
            return if self.completed_at.get().is_some() {
                IntroStage::Complete
            } else {
                IntroStage::Disposed
            };
        }
        match self.sequencer.as_ref().map(PhaseSequencer::state) {
            None => IntroStage::Preloading,
            Some(SequencerState::Running) => IntroStage::Playing,
            Some(SequencerState::Completed) => IntroStage::Complete,
            Some(SequencerState::Disposed) => IntroStage::Disposed,
        }
    }

    /// Active phase label, once playing.
    pub fn phase(&self) -> Option<&str> {
        self.sequencer.as_ref().map(|s| s.current().phase.as_str())
    }

    /// Look of the active phase.
    pub fn look(&self) -> &PhaseLook {
        &self.look
    }

    /// Instant the preloader released the gate.
    pub fn ready_at(&self) -> Option<Millis> {
        self.ready_at.get()
    }

    /// Instant the terminal phase was entered.
    pub fn completed_at(&self) -> Option<Millis> {
        self.completed_at.get()
    }

    /// Preload report, once ready.
    pub fn preload_report(&self) -> Option<&PreloadReport> {
        self.preloader.report()
    }

    /// The underlying preloader.
    pub fn preloader(&self) -> &AssetPreloader<F> {
        &self.preloader
    }

    /// The underlying sequencer, once started.
    pub fn sequencer(&self) -> Option<&PhaseSequencer> {
        self.sequencer.as_ref()
    }

    /// The active particle overlay.
    pub fn overlay(&self) -> Option<&ParticleOverlay> {
        self.overlay.as_ref()
    }

    /// Snapshot for painting at `now`.
    pub fn frame(&self, now: Millis) -> IntroFrame {
        let stage = self.stage();
        let playing = self.sequencer.is_some();
        let since_phase = now.since(self.entered_at);
        let (background, title) = if playing {
            (
                self.look
                    .background
                    .map(|b| b.motion.sample(since_phase))
                    .unwrap_or_default(),
                self.look.title.motion.sample(since_phase),
            )
        } else {
            (MotionSample::default(), MotionSample::default())
        };
        let particles = self
            .overlay
            .iter()
            .flat_map(|o| o.samples(now).map(|(_, s)| s))
            .collect();

        IntroFrame {
            at: now,
            stage,
            phase: self.phase().map(str::to_owned),
            since_phase,
            look: self.look,
            background,
            title,
            particles,
            archetype: self.overlay.as_ref().map(ParticleOverlay::archetype),
            progress: (self.preloader.settled(), self.preloader.total()),
        }
    }
}

impl<F: AssetFetcher> Scheduled for IntroSequence<F> {
    fn next_deadline(&self) -> Option<Millis> {
        if self.disposed {
            return None;
        }
        match self.sequencer.as_ref() {
            Some(seq) => seq.next_deadline(),
            None => self.preloader.next_deadline(),
        }
    }

    fn advance_to(&mut self, now: Millis) {
        if self.disposed {
            return;
        }
        if self.sequencer.is_none() {
            self.preloader.advance_to(now);
            self.open_gate();
        }
        if let Some(seq) = self.sequencer.as_mut() {
            seq.advance_to(now);
        }
        self.apply_changes();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/intro.rs"]
mod tests;
