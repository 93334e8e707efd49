use crate::animation::ease::Ease;
use crate::config::{FillDirection, RevealTiming};
use crate::foundation::core::Rect;
use crate::foundation::math::{clamp01, lerp};
use crate::reveal::clock::RevealClock;

/// Lifecycle of one headline animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Nothing started yet, or stopped.
    #[default]
    Idle,
    /// Progress is advancing.
    Revealing,
    /// Progress reached 1; waiting for the breathing overlay.
    Complete,
    /// Idle breathing overlay is running.
    Breathing,
    /// Visibility loss froze the previous phase.
    Paused,
}

/// One-shot notifications produced by [`RevealDirector::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectorEvent {
    /// Progress reached 1 for the first time in this run.
    Completed,
}

/// Horizontal fill wave that decides which tiles may draw at a given progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveGate {
    /// Sweep direction.
    pub direction: FillDirection,
    /// Ink box the sweep spans, in CSS px.
    pub ink: Option<Rect>,
    /// Linear progress in `[0, 1]`.
    pub progress: f64,
}

impl WaveGate {
    /// `true` when a tile at CSS x-position `x` is behind the wave front.
    ///
    /// Nothing is admitted at progress 0 and everything at progress 1.
    pub fn admits(&self, x: f64) -> bool {
        let p = self.progress;
        if p >= 1.0 {
            return true;
        }
        if p <= 0.0 || !x.is_finite() {
            return false;
        }
        let Some(ink) = self.ink else {
            return false;
        };
        let w = ink.width();
        match self.direction {
            FillDirection::Ltr => x < ink.x0 + w * p,
            FillDirection::Rtl => x > ink.x1 - w * p,
            FillDirection::Center => (x - ink.center().x).abs() < w * p * 0.5,
        }
    }

    /// CSS x-position of the leading edge (the rightmost one for `Center`).
    pub fn front_x(&self) -> Option<f64> {
        let ink = self.ink?;
        let p = clamp01(self.progress);
        let w = ink.width();
        Some(match self.direction {
            FillDirection::Ltr => ink.x0 + w * p,
            FillDirection::Rtl => ink.x1 - w * p,
            FillDirection::Center => ink.center().x + w * p * 0.5,
        })
    }
}

/// Everything the renderer needs from the director for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealFrame {
    /// Linear progress in `[0, 1]`.
    pub progress: f64,
    /// Eased progress.
    pub eased: f64,
    /// Current tile edge length in CSS px.
    pub tile_size_px: f64,
    /// Fraction of the pool that draws.
    pub density: f64,
    /// Opacity the host applies to the real text nodes.
    pub dom_opacity: f64,
    /// Multiplier left on the surface by the residue erase (1 = untouched).
    pub residue_keep: f64,
    /// Fill wave.
    pub wave: WaveGate,
}

impl RevealFrame {
    /// Palette blend of a tile: speed color early, settling onto the placed color.
    pub fn color_mix(&self, speed_mix: f64) -> f64 {
        clamp01(speed_mix) * (1.0 - self.eased)
    }

    /// `true` when slot `index` of a `count`-slot pool is within the drawn density.
    pub fn draws(&self, index: usize, count: usize) -> bool {
        if count == 0 {
            return false;
        }
        (index as f64 + 0.5) / count as f64 <= self.density
    }
}

/// DOM opacity: 0 before `start`, ease-out cubic up to 1 at progress 1.
pub fn dom_opacity(progress: f64, start: f64) -> f64 {
    let p = clamp01(progress);
    if p >= 1.0 {
        return 1.0;
    }
    let start = clamp01(start);
    if p <= start {
        return 0.0;
    }
    Ease::OutCubic.apply((p - start) / (1.0 - start))
}

/// Fraction of the tile layer kept by the destination-out erase past `start`.
pub fn residue_keep(progress: f64, start: f64) -> f64 {
    let p = clamp01(progress);
    let start = clamp01(start);
    if p < start {
        return 1.0;
    }
    if start >= 1.0 {
        return if p >= 1.0 { 0.0 } else { 1.0 };
    }
    1.0 - (p - start) / (1.0 - start)
}

/// Drawn pool fraction: ramps from `density_start` to 1 over the first half of the run.
pub fn density(progress: f64, density_start: f64) -> f64 {
    lerp(clamp01(density_start), 1.0, clamp01(progress * 2.0))
}

/// Drives progress, phase transitions and the per-frame reveal parameters.
#[derive(Clone, Debug)]
pub struct RevealDirector {
    timing: RevealTiming,
    clock: RevealClock,
    phase: Phase,
    paused_from: Option<Phase>,
    completion_fired: bool,
    runs: u32,
}

impl RevealDirector {
    /// Idle director.
    pub fn new(timing: RevealTiming) -> Self {
        Self {
            timing,
            clock: RevealClock::new(timing.delay_ms, timing.duration_ms),
            phase: Phase::Idle,
            paused_from: None,
            completion_fired: false,
            runs: 0,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Timing the director was built with.
    pub fn timing(&self) -> &RevealTiming {
        &self.timing
    }

    /// Underlying clock.
    pub fn clock(&self) -> &RevealClock {
        &self.clock
    }

    /// Number of runs started so far.
    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// Linear progress at `now_ms`.
    pub fn progress(&self, now_ms: f64) -> f64 {
        match self.phase {
            Phase::Idle => 0.0,
            Phase::Complete | Phase::Breathing => 1.0,
            Phase::Revealing | Phase::Paused => self.clock.progress(now_ms),
        }
    }

    /// Begin a fresh run; the completion callback is re-armed.
    pub fn start(&mut self, now_ms: f64) {
        self.clock = RevealClock::new(self.timing.delay_ms, self.timing.duration_ms);
        self.clock.start(now_ms);
        self.phase = Phase::Revealing;
        self.paused_from = None;
        self.completion_fired = false;
        self.runs = self.runs.saturating_add(1);
        tracing::debug!(run = self.runs, now_ms, "reveal started");
    }

    /// Skip straight to completion (reduced motion).
    pub fn finish(&mut self, now_ms: f64) -> Option<DirectorEvent> {
        if self.phase == Phase::Idle {
            self.runs = self.runs.saturating_add(1);
            self.completion_fired = false;
        }
        self.clock.finish(now_ms);
        self.phase = Phase::Complete;
        self.paused_from = None;
        self.fire_completion()
    }

    /// Advance phase bookkeeping.
    pub fn update(&mut self, now_ms: f64) -> Option<DirectorEvent> {
        if self.phase == Phase::Revealing && self.clock.progress(now_ms) >= 1.0 {
            self.phase = Phase::Complete;
            tracing::debug!(run = self.runs, "reveal complete");
            return self.fire_completion();
        }
        None
    }

    fn fire_completion(&mut self) -> Option<DirectorEvent> {
        if self.completion_fired {
            return None;
        }
        self.completion_fired = true;
        Some(DirectorEvent::Completed)
    }

    /// Hand the headline over to the breathing overlay. Only valid once complete.
    pub fn enter_breathing(&mut self) -> bool {
        if self.phase != Phase::Complete {
            return false;
        }
        self.phase = Phase::Breathing;
        tracing::debug!(run = self.runs, "breathing started");
        true
    }

    /// Freeze the current phase and the reveal clock.
    pub fn pause(&mut self, now_ms: f64) {
        match self.phase {
            Phase::Revealing | Phase::Complete | Phase::Breathing => {
                self.paused_from = Some(self.phase);
                self.phase = Phase::Paused;
                self.clock.pause(now_ms);
                tracing::debug!(now_ms, "reveal paused");
            }
            Phase::Idle | Phase::Paused => {}
        }
    }

    /// Restore the phase frozen by [`RevealDirector::pause`].
    pub fn resume(&mut self, now_ms: f64) {
        if let Some(prev) = self.paused_from.take() {
            let span = self.clock.resume(now_ms);
            self.phase = prev;
            tracing::debug!(now_ms, paused_ms = span, "reveal resumed");
        }
    }

    /// Phase that a pause froze, if paused.
    pub fn paused_from(&self) -> Option<Phase> {
        self.paused_from
    }

    /// Back to idle; the clock is forgotten.
    pub fn stop(&mut self) {
        self.phase = Phase::Idle;
        self.paused_from = None;
        self.clock.reset();
    }

    /// Per-frame reveal parameters.
    pub fn frame(&self, now_ms: f64, ink: Option<Rect>) -> RevealFrame {
        let t = &self.timing;
        let progress = self.progress(now_ms);
        let eased = t.ease.apply(progress);
        RevealFrame {
            progress,
            eased,
            tile_size_px: lerp(t.tile_start_px, t.tile_end_px, eased),
            density: density(progress, t.density_start),
            dom_opacity: if self.phase == Phase::Idle {
                0.0
            } else {
                dom_opacity(progress, t.dom_reveal_start)
            },
            residue_keep: residue_keep(progress, t.residue_fade_start),
            wave: WaveGate {
                direction: t.direction,
                ink,
                progress,
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/director.rs"]
mod tests;
