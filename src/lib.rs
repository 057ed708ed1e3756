//! cinereveal sequences a cinematic intro in front of a single-page presentation, and drives
//! a warp star-field transition between navigation actions.
//!
//! # Pipeline overview
//!
//! 1. **Preload**: [`AssetPreloader`] loads a bounded set of image references and fires
//!    its ready signal once, when everything settled or when the timeout elapsed.
//! 2. **Sequence**: the ready instant becomes the epoch of a [`PhaseSequencer`], a
//!    strictly forward timed state machine over a [`Timeline`].
//! 3. **Look up**: each phase change resolves a [`PhaseLook`] from the [`LookTable`] once
//!    and mounts that phase's [`ParticleOverlay`].
//! 4. **Paint** (optional): [`paint_intro_frame`] turns an [`IntroFrame`] snapshot into
//!    premultiplied RGBA8 pixels on the CPU.
//!
//! The warp transition is independent: [`WarpTransition`] runs a [`StarfieldRenderer`]
//! over any [`StarSurface`] and hands the destination to a [`Navigator`] when it ends.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single-threaded, cooperative**: every timed component implements [`Scheduled`] and
//!   is driven by a [`VirtualClock`] (deterministic) or a [`WallClock`] (real time).
//! - **Revocable**: timers live in owned [`TimerSet`]s; disposing or dropping an owner
//!   revokes everything it scheduled.
//! - **Deterministic visuals**: particle and star placement come from a seeded generator.
//!
//! For a longer walkthrough see [`crate::guide`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod effects;
mod foundation;
mod interact;
mod render;
mod sequence;
mod stage;
mod timing;

/// Standalone walkthrough of cinereveal's concepts and architecture.
pub mod guide;

pub use assets::decode::{PreparedImage, decode_image};
pub use assets::fetch::{
    AssetFetcher, DEFAULT_FETCH_THREADS, FsFetcher, Settle, resolve_reference,
};
pub use assets::preload::{AssetPreloader, AssetRecord, PreloadReport, ReadyCause, SettleState};
pub use config::{CaptionCue, CaptionSample, IntroConfig, disaster_timeline};
pub use effects::particles::{
    ArchetypeStyle, Particle, ParticleArchetype, ParticleOverlay, ParticleSample,
};
pub use effects::starfield::{
    Star, StarField, StarSurface, StarfieldParams, StarfieldRenderer, Streak, WarpState, project,
    streak_intensity,
};
pub use foundation::core::{Affine, Fps, Millis, Point, Rect, Rgba8Premul, Vec2, Viewport};
pub use foundation::ease::{Ease, sample_keys};
pub use foundation::error::{CineError, CineResult};
pub use foundation::rng::Rng64;
pub use interact::cursor::{
    CURSOR_INSET_RIGHT, CURSOR_INSET_TOP, CURSOR_SIZE, HINT_DELAY, HINT_FADE, HintState,
    InteractionCursor,
};
pub use interact::regions::{ElementId, Hit, HitTester, RegionId, RegionLayer};
pub use render::composite::{PremulRgba8, fade_to_black_in_place, over, over_in_place};
pub use render::cpu::CpuStarSurface;
pub use render::paint::{paint_captions, paint_intro_frame, title_blocks};
pub use render::{FrameRGBA, save_png};
pub use sequence::looks::{BackgroundLook, LookTable, Motion, MotionSample, PhaseLook, TitleLook};
pub use sequence::sequencer::{PhaseChange, PhaseSequencer, SequencerState};
pub use sequence::timeline::{Timeline, TimelineEntry};
pub use stage::intro::{IntroFrame, IntroSequence, IntroStage};
pub use stage::warp::{Navigator, WarpTransition};
pub use timing::cancel::CancelToken;
pub use timing::clock::{Scheduled, VirtualClock, WallClock};
pub use timing::timers::{TimerId, TimerSet};
