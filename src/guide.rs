//! # cinereveal guide (v0.1.0)
//!
//! This module walks through cinereveal's architecture and public API end to end.
//! It describes what "an intro" and "a warp" mean in this codebase, so integrations share
//! one mental model of the timing rules.
//!
//! If you are looking for copy/paste commands, start with the repository `README.md`.
//!
//! ---
//!
//! ## Core concepts
//!
//! - [`Millis`](crate::Millis): sequence time in whole milliseconds
//! - [`Scheduled`](crate::Scheduled): anything with deadlines that a clock can advance
//! - [`AssetPreloader`](crate::AssetPreloader): bounded preload with a one-shot ready signal
//! - [`Timeline`](crate::Timeline): ordered `(phase, offset)` pairs; the last phase is terminal
//! - [`PhaseSequencer`](crate::PhaseSequencer): walks a timeline forward from an epoch
//! - [`LookTable`](crate::LookTable): phase label to [`PhaseLook`](crate::PhaseLook)
//! - [`ParticleOverlay`](crate::ParticleOverlay): seeded decorative particles for one phase
//! - [`IntroSequence`](crate::IntroSequence): preload, sequencing and lookups wired together
//! - [`WarpTransition`](crate::WarpTransition): star-field warp followed by navigation
//!
//! The intro is explicitly staged:
//!
//! 1. Preload: [`AssetPreloader::start`](crate::AssetPreloader::start)
//! 2. Gate: the ready signal fires once, when every asset settled or the timeout elapsed
//! 3. Sequence: the ready instant becomes the [`PhaseSequencer`](crate::PhaseSequencer) epoch
//! 4. Snapshot: [`IntroSequence::frame`](crate::IntroSequence::frame) returns an
//!    [`IntroFrame`](crate::IntroFrame) for painting
//!
//! ---
//!
//! ## Time is passed in, never read
//!
//! No component calls `Instant::now()`. Each one is constructed with a start instant and
//! implements [`Scheduled`](crate::Scheduled):
//!
//! - `next_deadline()` reports the earliest instant at which it has work
//! - `advance_to(now)` performs everything due at or before `now`
//!
//! Two drivers exist:
//!
//! - [`VirtualClock`](crate::VirtualClock) jumps straight from deadline to deadline; tests and
//!   the offline CLI use it, so a 23 second intro runs instantly and deterministically
//! - [`WallClock`](crate::WallClock) sleeps until the next deadline and polls background work
//!
//! Deadlines are revocable. Timers live in a [`TimerSet`](crate::TimerSet) owned by the
//! component that scheduled them, so dropping or disposing the owner revokes them all.
//!
//! ---
//!
//! ## Preloading
//!
//! [`AssetPreloader`](crate::AssetPreloader) hands every reference to an
//! [`AssetFetcher`](crate::AssetFetcher) and counts settled attempts. A failed load counts as
//! settled; failures never block readiness. The ready signal fires exactly once with a
//! [`PreloadReport`](crate::PreloadReport) whose [`ReadyCause`](crate::ReadyCause) tells whether
//! everything settled or the timeout won. An empty asset list is ready immediately.
//!
//! [`FsFetcher`](crate::FsFetcher) loads files on worker threads and decodes them into
//! [`PreparedImage`](crate::PreparedImage)s. References are resolved against a root directory
//! and may not escape it.
//!
//! ---
//!
//! ## Sequencing and looks
//!
//! A [`Timeline`](crate::Timeline) is validated on construction: it is non-empty, its first
//! offset is zero, offsets strictly increase and labels are unique. The sequencer enters phase
//! `i` at `epoch + offset_i` and never moves backwards; entering the final phase marks the
//! sequence complete and fires the completion callback once.
//!
//! Each phase change resolves a look from the [`LookTable`](crate::LookTable) once. Phases
//! without an entry fall back to the default look. The terminal phase of the built-in
//! [disaster preset](crate::LookTable::disaster_preset) is invisible, so the page below
//! shows through once the intro ends.
//!
//! ---
//!
//! ## Particles
//!
//! A [`ParticleOverlay`](crate::ParticleOverlay) is mounted per phase from that phase's
//! [`ParticleArchetype`](crate::ParticleArchetype). Until the drawing surface is known
//! ([`IntroSequence::surface_ready`](crate::IntroSequence::surface_ready)) the overlay is empty.
//! Placement comes from [`Rng64`](crate::Rng64) forked by phase index, so the same seed always
//! yields the same particles.
//!
//! ---
//!
//! ## The warp
//!
//! [`StarfieldRenderer`](crate::StarfieldRenderer) steps a [`StarField`](crate::StarField)
//! once per frame and draws streaks through any [`StarSurface`](crate::StarSurface). Without a
//! surface it is inert and never completes. [`WarpTransition`](crate::WarpTransition) wraps the
//! renderer and calls its [`Navigator`](crate::Navigator) once, after the run completes.
//! Cancelling through a [`CancelToken`](crate::CancelToken) stops both.
//!
//! [`CpuStarSurface`](crate::CpuStarSurface) is the bundled surface: it keeps the previous frame,
//! darkens it for trails and rasterizes streaks with `vello_cpu`.
//!
//! ---
//!
//! ## Minimal example
//!
//! ```rust,no_run
//! use cinereveal::{
//!     FsFetcher, IntroConfig, IntroSequence, IntroStage, Millis, Scheduled, VirtualClock,
//!     paint_intro_frame, save_png,
//! };
//!
//! fn main() -> anyhow::Result<()> {
//!     let cfg = IntroConfig::default();
//!     let mut intro = IntroSequence::start(&cfg, FsFetcher::new("public")?, Millis(0));
//!     intro.surface_ready(cfg.viewport);
//!
//!     let mut clock = VirtualClock::new(Millis(0));
//!     clock.run_until(&mut [&mut intro as &mut dyn Scheduled], Millis(7_500));
//!     assert_eq!(intro.stage(), IntroStage::Playing);
//!
//!     let frame = paint_intro_frame(&intro.frame(clock.now()), &cfg.title, cfg.viewport)?;
//!     save_png(&frame, [0, 0, 0, 255], "out/fire.png".as_ref())?;
//!     Ok(())
//! }
//! ```
