//! Idle "breathing" overlay shown once the reveal has settled.
//!
//! Tiles sit on a coalesced grid over the glyphs and pulse in place. They come in staged:
//! each tile's intro key decides when inside the intro ramp it starts its own short fade.

use std::f64::consts::TAU;

use crate::animation::sine::fast_sin;
use crate::config::BreathConfig;
use crate::foundation::core::{Point, Vec2};
use crate::foundation::math::{cell_hash, clamp01, hash01};
use crate::mask::builder::GlyphMask;
use crate::mask::sampler::tile_grid;
use crate::schedule::gate::FrameRequest;

const SALT_PHASE: u8 = 0x31;
const SALT_RATE: u8 = 0x32;
const SALT_DIR: u8 = 0x33;
const SALT_INTRO: u8 = 0x34;

/// Weight of the horizontal position in a tile's intro key; the rest is per-cell noise.
const INTRO_SWEEP: f64 = 0.75;

/// One breathing tile. Every field is derived from its grid cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BreathTile {
    /// Rest position in CSS px.
    pub pos: Point,
    /// Phase offset in radians.
    pub phase: f64,
    /// Oscillation rate multiplier in `[0.6, 1.4]`.
    pub rate: f64,
    /// Spatial phase drift in radians, scaled by the configured drift at sample time.
    pub spatial: f64,
    /// Activation order in `[0, 1]`.
    pub intro_key: f64,
    /// Unit wobble direction.
    pub dir: Vec2,
}

/// Coalesce the mask into a `pitch`-px grid of breathing tiles.
pub fn breath_tiles(mask: &GlyphMask, pitch: f64) -> Vec<BreathTile> {
    let css = mask.css_size();
    let (w, h) = (css.width.max(1.0), css.height.max(1.0));
    tile_grid(mask, pitch)
        .into_iter()
        .map(|cell| {
            let (ix, iy) = (cell.ix, cell.iy);
            let angle = TAU * hash01(cell_hash(ix, iy, SALT_DIR));
            let xn = clamp01(cell.pos.x / w);
            let yn = clamp01(cell.pos.y / h);
            BreathTile {
                pos: cell.pos,
                phase: TAU * hash01(cell_hash(ix, iy, SALT_PHASE)),
                rate: 0.6 + 0.8 * hash01(cell_hash(ix, iy, SALT_RATE)),
                spatial: TAU * (xn * 0.8 + yn * 0.2),
                intro_key: clamp01(
                    INTRO_SWEEP * xn + (1.0 - INTRO_SWEEP) * hash01(cell_hash(ix, iy, SALT_INTRO)),
                ),
                dir: Vec2::new(angle.cos(), angle.sin()),
            }
        })
        .collect()
}

/// One tile as drawn at a given instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BreathSample {
    /// Center in CSS px.
    pub pos: Point,
    /// Edge length in CSS px.
    pub size: f64,
    /// Straight alpha in `[0, 1]`.
    pub alpha: f64,
}

/// Render cadence of the overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PowerMode {
    /// One render per animation frame.
    #[default]
    Continuous,
    /// Sparse renders on a timeout, with a probe frame after each.
    LowPower,
}

/// Watches frame gaps and switches between continuous and low-power rendering.
///
/// In low power every timeout render is followed by one probe frame. If the probe arrives
/// within the gap threshold the monitor goes back to continuous.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerMonitor {
    mode: PowerMode,
    probing: bool,
    forced: bool,
    last_frame_ms: Option<f64>,
    gap_ms: f64,
    interval_ms: f64,
}

impl PowerMonitor {
    /// Continuous monitor with the given gap threshold and low-power interval.
    pub fn new(gap_ms: f64, interval_ms: f64) -> Self {
        Self {
            mode: PowerMode::Continuous,
            probing: false,
            forced: false,
            last_frame_ms: None,
            gap_ms,
            interval_ms,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> PowerMode {
        self.mode
    }

    /// Hold low-power mode regardless of frame gaps (hidden page).
    pub fn set_forced(&mut self, forced: bool) {
        if forced == self.forced {
            return;
        }
        self.forced = forced;
        if forced {
            self.switch(PowerMode::LowPower);
            self.probing = false;
        } else if self.mode == PowerMode::LowPower {
            self.probing = true;
        }
    }

    /// Forget the last frame time (after a pause or a restart).
    pub fn reset(&mut self) {
        self.last_frame_ms = None;
        self.probing = false;
        if !self.forced {
            self.switch(PowerMode::Continuous);
        }
    }

    /// Record a rendered frame and return the resulting mode.
    pub fn observe(&mut self, now_ms: f64) -> PowerMode {
        let gap = self.last_frame_ms.map(|last| now_ms - last);
        self.last_frame_ms = Some(now_ms);
        if self.forced {
            return self.mode;
        }
        match self.mode {
            PowerMode::Continuous => {
                if gap.is_some_and(|g| g > self.gap_ms) {
                    self.switch(PowerMode::LowPower);
                    self.probing = false;
                }
            }
            PowerMode::LowPower if self.probing => {
                if gap.is_some_and(|g| g <= self.gap_ms) {
                    self.switch(PowerMode::Continuous);
                }
                self.probing = false;
            }
            PowerMode::LowPower => self.probing = true,
        }
        self.mode
    }

    /// What to ask the host for after the frame just observed.
    pub fn next_request(&self) -> FrameRequest {
        match self.mode {
            PowerMode::Continuous => FrameRequest::NextFrame,
            PowerMode::LowPower if self.probing && !self.forced => FrameRequest::NextFrame,
            PowerMode::LowPower => FrameRequest::After(self.interval_ms),
        }
    }

    fn switch(&mut self, mode: PowerMode) {
        if self.mode != mode {
            tracing::debug!(from = ?self.mode, to = ?mode, "breathing power mode changed");
            self.mode = mode;
        }
    }
}

/// Staged-activation breathing animation over a fixed tile set.
#[derive(Clone, Debug)]
pub struct BreathOverlay {
    cfg: BreathConfig,
    pitch: f64,
    tiles: Vec<BreathTile>,
    started_at_ms: Option<f64>,
    power: PowerMonitor,
}

impl BreathOverlay {
    /// Stopped overlay whose tiles have edge length `pitch`.
    pub fn new(cfg: BreathConfig, pitch: f64) -> Self {
        Self {
            cfg,
            pitch: if pitch.is_finite() { pitch.max(1.0) } else { 3.0 },
            tiles: Vec::new(),
            started_at_ms: None,
            power: PowerMonitor::new(cfg.low_power_gap_ms, cfg.low_power_interval_ms),
        }
    }

    /// Replace the tile set; a running overlay keeps its clock.
    pub fn set_tiles(&mut self, tiles: Vec<BreathTile>) {
        self.tiles = tiles;
    }

    /// Current tiles.
    pub fn tiles(&self) -> &[BreathTile] {
        &self.tiles
    }

    /// Start breathing at `now_ms`.
    pub fn start(&mut self, now_ms: f64) {
        self.started_at_ms = Some(now_ms);
        self.power.reset();
        tracing::debug!(tiles = self.tiles.len(), "breathing overlay started");
    }

    /// Stop and forget the clock.
    pub fn stop(&mut self) {
        self.started_at_ms = None;
        self.power.reset();
    }

    /// `true` once started.
    pub fn is_running(&self) -> bool {
        self.started_at_ms.is_some()
    }

    /// Push the clock forward by a paused span.
    pub fn shift(&mut self, span_ms: f64) {
        if let Some(s) = self.started_at_ms.as_mut()
            && span_ms.is_finite()
        {
            *s += span_ms.max(0.0);
        }
        self.power.reset();
    }

    /// Power monitor driving the render cadence.
    pub fn power(&self) -> &PowerMonitor {
        &self.power
    }

    /// Mutable power monitor.
    pub fn power_mut(&mut self) -> &mut PowerMonitor {
        &mut self.power
    }

    /// Milliseconds since start.
    pub fn elapsed(&self, now_ms: f64) -> f64 {
        self.started_at_ms
            .map(|s| (now_ms - s).max(0.0))
            .filter(|e| e.is_finite())
            .unwrap_or(0.0)
    }

    /// Intro activation of `tile` after `elapsed_ms`, in `[0, 1]`.
    ///
    /// Activation starts at `intro_key * intro_ms` and completes `tile_ramp_ms` later, so a
    /// lower key is never visible later than a higher one.
    pub fn activation(&self, tile: &BreathTile, elapsed_ms: f64) -> f64 {
        let start = clamp01(tile.intro_key) * self.cfg.intro_ms;
        let t = elapsed_ms - start;
        if self.cfg.tile_ramp_ms <= 0.0 {
            return if t >= 0.0 { 1.0 } else { 0.0 };
        }
        clamp01(t / self.cfg.tile_ramp_ms)
    }

    /// Draw state of `tile` at `now_ms`, or `None` while it is not yet visible.
    pub fn sample(&self, tile: &BreathTile, now_ms: f64) -> Option<BreathSample> {
        self.started_at_ms?;
        let elapsed = self.elapsed(now_ms);
        let act = self.activation(tile, elapsed);
        if act <= 0.0 {
            return None;
        }
        let c = &self.cfg;
        let omega = TAU / c.period_ms;
        let v = 0.5 + 0.5 * fast_sin(tile.phase + omega * elapsed * tile.rate + tile.spatial * c.drift);
        let swing = 2.0 * v - 1.0;
        Some(BreathSample {
            pos: tile.pos + tile.dir * (c.wobble_px * swing),
            size: self.pitch * (1.0 + c.amplitude * 0.5 * swing),
            alpha: clamp01(c.base_alpha * (1.0 + c.amplitude * swing) * act),
        })
    }

    /// Draw state of every visible tile.
    pub fn samples(&self, now_ms: f64) -> impl Iterator<Item = BreathSample> + '_ {
        self.tiles.iter().filter_map(move |t| self.sample(t, now_ms))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/breath/overlay.rs"]
mod tests;
