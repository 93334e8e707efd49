//! tile-reveal is a particle "tile reveal" and idle "breathing" engine for headline text.
//!
//! A headline is rasterized to an alpha mask, the mask is sampled into contour and interior
//! attractor points, and a fixed pool of square tiles orbits the glyph outlines while a
//! progress-driven director sweeps them in and fades the accessible text up. Once the reveal
//! completes, a low-cost breathing overlay takes over.
//!
//! # Pipeline overview
//!
//! 1. **Mask**: `text + TextMetrics -> GlyphMask` (device-pixel alpha, per-line layout)
//! 2. **Sample**: `GlyphMask -> EmitterSet / BreathTile`s (deterministic per grid cell)
//! 3. **Simulate**: `ParticleField::step` each frame, gated by `RevealDirector`
//! 4. **Render**: tiles into a `TileSurface` (`vello_cpu`, premultiplied RGBA8)
//!
//! The host (a browser shim, the bundled CLI, a test) owns the frame loop. It forwards layout,
//! visibility and pointer signals to a [`Headline`] and calls [`Headline::tick`] whenever
//! the returned [`FrameRequest`] asks for it.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Never fails per frame**: degenerate sizes defer, empty sample sets fall back to the
//!   surface center, missing metrics use fixed defaults.
//! - **Deterministic**: masks, emitters and breathing tiles depend only on their inputs;
//!   respawn jitter uses a seeded RNG.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod breath;
mod config;
mod field;
mod foundation;
mod headline;
mod mask;
mod render;
mod reveal;
mod schedule;

pub use animation::ease::Ease;
pub use animation::sine::{fast_cos, fast_sin};
pub use breath::overlay::{
    BreathOverlay, BreathSample, BreathTile, PowerMode, PowerMonitor, breath_tiles,
};
pub use config::{
    BreathConfig, FieldConfig, FillDirection, Palette, PointerConfig, RevealConfig, RevealTiming,
    ScheduleConfig,
};
pub use field::holes::{Hole, HoleList, MAX_HOLES};
pub use field::particle::{EXPIRE_FADE_MS, MotionMode, Particle, SPAWN_FADE_MS};
pub use field::pool::{HOLE_RADIUS_SCALE, ParticleField, speed_mix};
pub use foundation::core::{CssSize, Point, Rect, Rgb8, Rgba8Premul, Vec2};
pub use foundation::error::{RevealError, RevealResult};
pub use headline::{CompleteFn, Headline, HostEnv};
pub use mask::builder::{DPR_RANGE, GlyphMask, MaskInputs, build_mask, clamp_dpr, layout_lines};
pub use mask::metrics::{BlockFace, FontSpec, GlyphPainter, LineLayout, TextMetrics};
pub use mask::parley_face::ParleyFace;
pub use mask::sampler::{
    EDGE_ALPHA, EDGE_MIN_GRADIENT, EmitterPoint, EmitterSet, GridCell, INTERIOR_ALPHA,
    INTERIOR_KEEP, Probe, probe, sample_emitters, tile_grid,
};
pub use render::surface::{FrameRGBA, Tile, TileSurface};
pub use reveal::clock::RevealClock;
pub use reveal::director::{
    DirectorEvent, Phase, RevealDirector, RevealFrame, WaveGate, density, dom_opacity,
    residue_keep,
};
pub use schedule::gate::{AdaptiveBudget, FrameRequest, TimerKind, Timers, VisibilityGate};

/// `vello_cpu` re-export, so custom [`GlyphPainter`]s can name the render context.
pub use vello_cpu;
