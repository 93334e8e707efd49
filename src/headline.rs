//! Per-instance facade that wires the mask, sampler, field, director and overlay to host
//! callbacks.
//!
//! The host owns the real text element and the frame loop. It forwards layout, visibility
//! and pointer signals to the `on_*` methods and calls [`Headline::tick`] whenever the
//! previous tick's [`FrameRequest`] asks for it.

use crate::breath::overlay::{BreathOverlay, breath_tiles};
use crate::config::RevealConfig;
use crate::field::pool::{ParticleField, speed_mix};
use crate::foundation::core::{CssSize, Point};
use crate::mask::builder::{GlyphMask, MaskInputs, build_mask};
use crate::mask::metrics::{GlyphPainter, TextMetrics};
use crate::mask::sampler::{EmitterSet, sample_emitters};
use crate::render::surface::{FrameRGBA, Tile, TileSurface};
use crate::reveal::director::{DirectorEvent, Phase, RevealDirector};
use crate::schedule::gate::{AdaptiveBudget, FrameRequest, TimerKind, Timers, VisibilityGate};

/// Longest frame delta fed to the particle integrator.
const MAX_TICK_DT_MS: f64 = 100.0;

/// Host facts fixed for the lifetime of a headline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostEnv {
    /// The user asked for reduced motion.
    pub reduced_motion: bool,
    /// Raw device pixel ratio.
    pub device_pixel_ratio: f64,
    /// Viewport width in CSS px (selects the particle count).
    pub viewport_width: f64,
}

impl Default for HostEnv {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            device_pixel_ratio: 1.0,
            viewport_width: 1280.0,
        }
    }
}

/// Completion hook; called once per run.
pub type CompleteFn = Box<dyn FnMut()>;

/// One animated headline.
pub struct Headline {
    cfg: RevealConfig,
    env: HostEnv,
    text: String,
    container: CssSize,
    metrics: Option<Box<dyn TextMetrics>>,
    painter: Option<Box<dyn GlyphPainter>>,
    mask: Option<GlyphMask>,
    emitters: EmitterSet,
    field: ParticleField,
    director: RevealDirector,
    breath: BreathOverlay,
    surface: Option<TileSurface>,
    gate: VisibilityGate,
    timers: Timers,
    budget: AdaptiveBudget,
    pending_size: Option<CssSize>,
    start_pending: bool,
    on_complete: Option<CompleteFn>,
    last_tick_ms: Option<f64>,
    paused_at_ms: Option<f64>,
    dom_opacity: f64,
    fading_out: bool,
    destroyed: bool,
}

impl std::fmt::Debug for Headline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Headline")
            .field("text", &self.text)
            .field("container", &self.container)
            .field("phase", &self.director.phase())
            .field("dom_opacity", &self.dom_opacity)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl Headline {
    /// Create an idle headline. Nothing is measured or drawn until a face and a container
    /// size are supplied.
    pub fn new(text: impl Into<String>, cfg: RevealConfig, env: HostEnv) -> Self {
        let capacity = cfg.particle_count(env.viewport_width);
        Self {
            cfg,
            env,
            text: text.into(),
            container: CssSize::default(),
            metrics: None,
            painter: None,
            mask: None,
            emitters: EmitterSet::default(),
            field: ParticleField::new(capacity, cfg.field, cfg.pointer),
            director: RevealDirector::new(cfg.reveal),
            breath: BreathOverlay::new(cfg.breath, cfg.reveal.tile_end_px),
            surface: None,
            gate: VisibilityGate::default(),
            timers: Timers::default(),
            budget: AdaptiveBudget::new(cfg.schedule, cfg.field.update_budget),
            pending_size: None,
            start_pending: false,
            on_complete: None,
            last_tick_ms: None,
            paused_at_ms: None,
            dom_opacity: 0.0,
            fading_out: false,
            destroyed: false,
        }
    }

    /// Attach the measuring and painting capabilities of the live text element.
    pub fn with_face(
        mut self,
        metrics: Box<dyn TextMetrics>,
        painter: Box<dyn GlyphPainter>,
    ) -> Self {
        self.metrics = Some(metrics);
        self.painter = Some(painter);
        self
    }

    /// Register the completion hook.
    pub fn set_on_complete(&mut self, f: CompleteFn) {
        self.on_complete = Some(f);
    }

    /// Configuration in use.
    pub fn config(&self) -> &RevealConfig {
        &self.cfg
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.director.phase()
    }

    /// Reveal progress at `now_ms`.
    pub fn progress(&self, now_ms: f64) -> f64 {
        self.director.progress(now_ms)
    }

    /// Opacity the host should apply to the real text nodes.
    pub fn dom_opacity(&self) -> f64 {
        self.dom_opacity
    }

    /// Current mask, once built.
    pub fn mask(&self) -> Option<&GlyphMask> {
        self.mask.as_ref()
    }

    /// Emitters of the current mask.
    pub fn emitters(&self) -> &EmitterSet {
        &self.emitters
    }

    /// Particle pool.
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    /// Breathing overlay.
    pub fn breath(&self) -> &BreathOverlay {
        &self.breath
    }

    /// Tile surface, once built.
    pub fn surface(&self) -> Option<&TileSurface> {
        self.surface.as_ref()
    }

    /// Armed timeouts.
    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Copy of the current tile layer.
    pub fn read_frame(&self) -> Option<FrameRGBA> {
        self.surface.as_ref().map(TileSurface::read_frame)
    }

    /// `true` once [`Headline::destroy`] ran.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn has_face(&self) -> bool {
        self.metrics.is_some() && self.painter.is_some()
    }

    /// Start the reveal.
    ///
    /// With reduced motion the run completes synchronously: the hook fires before this
    /// returns, the DOM text is fully opaque and no frame loop or breathing follows.
    /// Without a usable container size the run starts at the first successful build.
    pub fn start(&mut self, now_ms: f64) -> FrameRequest {
        if self.destroyed {
            return FrameRequest::Idle;
        }
        if self.env.reduced_motion {
            if let Some(DirectorEvent::Completed) = self.director.finish(now_ms) {
                self.dom_opacity = 1.0;
                tracing::debug!("reduced motion: reveal skipped");
                self.fire_complete();
            }
            return FrameRequest::Idle;
        }
        if !self.has_face() {
            tracing::debug!("start ignored: no text face attached");
            return FrameRequest::Idle;
        }
        if self.mask.is_none() && !self.rebuild(now_ms) {
            tracing::debug!("start deferred until the container has a size");
            self.start_pending = true;
            return self.request(now_ms);
        }
        self.restart(now_ms);
        self.request(now_ms)
    }

    fn restart(&mut self, now_ms: f64) {
        self.start_pending = false;
        self.breath.stop();
        self.timers.cancel(TimerKind::BreathStart);
        self.timers.cancel(TimerKind::LowPowerResume);
        self.field.wake(&self.emitters, now_ms);
        self.fading_out = false;
        self.dom_opacity = 0.0;
        self.last_tick_ms = None;
        self.paused_at_ms = None;
        self.budget.reset_clock();
        self.director.start(now_ms);
        if !self.gate.can_run() {
            self.pause_run(now_ms);
        }
    }

    /// Freeze the director; timeouts only a running phase consumes are held.
    fn pause_run(&mut self, now_ms: f64) {
        self.director.pause(now_ms);
        self.paused_at_ms = Some(now_ms);
        self.timers.hold(TimerKind::BreathStart, now_ms);
        self.timers.hold(TimerKind::LowPowerResume, now_ms);
    }

    fn resume_run(&mut self, now_ms: f64) {
        self.director.resume(now_ms);
        if let Some(at) = self.paused_at_ms.take() {
            self.breath.shift(now_ms - at);
        }
        self.timers.release(TimerKind::BreathStart, now_ms);
        self.timers.release(TimerKind::LowPowerResume, now_ms);
    }

    /// Host container resized. The first size builds immediately; later ones are debounced.
    pub fn on_resize(&mut self, size: CssSize, now_ms: f64) {
        if self.destroyed || self.env.reduced_motion {
            return;
        }
        if self.mask.is_none() {
            self.container = size;
            self.timers.cancel(TimerKind::ResizeDebounce);
            self.pending_size = None;
            self.rebuild(now_ms);
            return;
        }
        self.pending_size = Some(size);
        self.timers.schedule(
            TimerKind::ResizeDebounce,
            now_ms + self.cfg.schedule.resize_debounce_ms,
        );
    }

    /// The host element entered or left the viewport.
    pub fn on_intersection_change(&mut self, intersecting: bool, now_ms: f64) {
        if self.destroyed || !self.gate.set_intersecting(intersecting) {
            return;
        }
        self.apply_visibility(now_ms);
    }

    /// The page was shown or hidden.
    pub fn on_visibility_change(&mut self, visible: bool, now_ms: f64) {
        if self.destroyed || !self.gate.set_page_visible(visible) {
            return;
        }
        self.apply_visibility(now_ms);
    }

    fn apply_visibility(&mut self, now_ms: f64) {
        let phase = self.director.phase();
        if self.gate.can_run() {
            self.breath.power_mut().set_forced(false);
            if phase == Phase::Paused {
                self.resume_run(now_ms);
            }
            self.last_tick_ms = None;
            self.budget.reset_clock();
            return;
        }
        if !self.gate.intersecting() {
            self.breath.power_mut().set_forced(false);
            if phase != Phase::Paused && phase != Phase::Idle {
                self.pause_run(now_ms);
            }
            return;
        }
        // hidden tab: the reveal clock stops, breathing keeps ticking sparsely
        match phase {
            Phase::Breathing => self.breath.power_mut().set_forced(true),
            Phase::Revealing | Phase::Complete => self.pause_run(now_ms),
            Phase::Paused if self.director.paused_from() == Some(Phase::Breathing) => {
                self.resume_run(now_ms);
                self.breath.power_mut().set_forced(true);
            }
            Phase::Paused | Phase::Idle => {}
        }
    }

    /// Pointer moved over the headline, in CSS px relative to the container.
    pub fn on_pointer_move(&mut self, p: Point, now_ms: f64) {
        if self.destroyed || self.mask.is_none() {
            return;
        }
        self.field.pointer_move(p, now_ms);
        if self.cfg.reveal.retrigger_on_hover && self.director.phase() == Phase::Breathing {
            tracing::debug!("reveal retriggered by pointer");
            self.restart(now_ms);
        }
    }

    /// Pointer left the headline.
    pub fn on_pointer_leave(&mut self) {
        self.field.pointer_leave();
    }

    /// Web fonts finished loading; metrics may have changed.
    pub fn on_font_loaded(&mut self, now_ms: f64) {
        if self.destroyed || self.env.reduced_motion {
            return;
        }
        self.rebuild(now_ms);
    }

    /// Replace the text and rebuild at the held progress.
    pub fn set_text(&mut self, text: impl Into<String>, now_ms: f64) {
        self.text = text.into();
        if self.destroyed || self.env.reduced_motion {
            return;
        }
        self.rebuild(now_ms);
    }

    /// Rebuild mask, emitters, surface, field and breathing tiles from scratch.
    fn rebuild(&mut self, now_ms: f64) -> bool {
        let (Some(metrics), Some(painter)) =
            (self.metrics.as_deref_mut(), self.painter.as_deref_mut())
        else {
            return false;
        };
        let inputs = MaskInputs {
            text: self.text.clone(),
            container: self.container,
            device_pixel_ratio: self.env.device_pixel_ratio,
            feather_px: self.cfg.field.feather_px,
        };
        let Some(mask) = build_mask(&inputs, metrics, painter) else {
            return false;
        };
        let css = mask.css_size();
        self.emitters = sample_emitters(&mask, self.cfg.field.sample_step_px);
        self.surface = TileSurface::new(css, mask.dpr());

        let capacity = self.cfg.particle_count(self.env.viewport_width);
        if self.field.particles().len() != capacity {
            self.field = ParticleField::new(capacity, self.cfg.field, self.cfg.pointer);
        }
        self.field.reseed(&self.emitters, css, now_ms);
        self.field.set_update_budget(self.budget.budget());
        if self.fading_out {
            self.field.begin_fade_out();
        }
        self.breath
            .set_tiles(breath_tiles(&mask, self.cfg.reveal.tile_end_px));

        tracing::debug!(
            width = css.width,
            height = css.height,
            edge = self.emitters.edge.len(),
            interior = self.emitters.interior.len(),
            breath_tiles = self.breath.tiles().len(),
            "headline rebuilt"
        );
        self.mask = Some(mask);
        if self.start_pending {
            self.restart(now_ms);
        }
        true
    }

    /// Advance one frame and say when to call again.
    pub fn tick(&mut self, now_ms: f64) -> FrameRequest {
        if self.destroyed || self.env.reduced_motion {
            return FrameRequest::Idle;
        }
        if self.timers.take_due(TimerKind::ResizeDebounce, now_ms)
            && let Some(size) = self.pending_size.take()
        {
            self.container = size;
            self.rebuild(now_ms);
        }
        if !self.has_face() || self.mask.is_none() {
            return self.request(now_ms);
        }

        match self.director.phase() {
            Phase::Idle | Phase::Paused => {}
            Phase::Revealing | Phase::Complete => self.tick_reveal(now_ms),
            Phase::Breathing => self.tick_breath(now_ms),
        }
        self.request(now_ms)
    }

    fn tick_reveal(&mut self, now_ms: f64) {
        let dt = match self.last_tick_ms.replace(now_ms) {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_TICK_DT_MS),
            None => 0.0,
        };
        let budget = self.budget.observe(now_ms);
        self.field.set_update_budget(budget);

        if let Some(DirectorEvent::Completed) = self.director.update(now_ms) {
            self.dom_opacity = 1.0;
            self.timers.schedule(
                TimerKind::BreathStart,
                now_ms + self.cfg.reveal.breath_start_delay_ms,
            );
            self.fire_complete();
        }

        if self.director.phase() == Phase::Complete {
            if let Some(s) = self.surface.as_mut() {
                s.clear();
            }
            if self.timers.take_due(TimerKind::BreathStart, now_ms) && self.director.enter_breathing()
            {
                self.breath.start(now_ms);
                self.tick_breath(now_ms);
            }
            return;
        }

        let Some(mask) = self.mask.as_ref() else {
            return;
        };
        let frame = self.director.frame(now_ms, mask.ink_bounds());
        if !self.fading_out && frame.progress >= self.cfg.reveal.residue_fade_start {
            self.fading_out = true;
            self.field.begin_fade_out();
        }
        self.field.step(mask, &self.emitters, now_ms, dt);
        self.dom_opacity = frame.dom_opacity;

        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let palette = self.cfg.palette;
        let max_speed = self.cfg.field.max_speed;
        let particles = self.field.particles();
        let count = particles.len();
        let tiles = particles.iter().enumerate().filter_map(|(i, p)| {
            if !p.is_live() || !frame.draws(i, count) || !frame.wave.admits(p.pos.x) {
                return None;
            }
            let mix = frame.color_mix(speed_mix(p.speed(), max_speed));
            Some(Tile {
                center: p.pos,
                size: frame.tile_size_px * p.size,
                color: palette.placed.lerp(palette.active, mix),
                alpha: p.fade(now_ms),
            })
        });
        surface.draw_tiles(tiles);
        surface.destination_out(frame.residue_keep);
    }

    fn tick_breath(&mut self, now_ms: f64) {
        self.timers.cancel(TimerKind::LowPowerResume);
        self.breath.power_mut().observe(now_ms);
        if let Some(surface) = self.surface.as_mut() {
            let color = self.cfg.palette.active;
            surface.draw_tiles(self.breath.samples(now_ms).map(|s| Tile {
                center: s.pos,
                size: s.size,
                color,
                alpha: s.alpha,
            }));
        }
        if let FrameRequest::After(ms) = self.breath.power().next_request() {
            self.timers.schedule(TimerKind::LowPowerResume, now_ms + ms);
        }
    }

    /// What the host should schedule next, given the current state.
    pub fn request(&self, now_ms: f64) -> FrameRequest {
        if self.destroyed || self.env.reduced_motion {
            return FrameRequest::Idle;
        }
        let timers = match self.timers.next_in(now_ms) {
            Some(ms) => FrameRequest::After(ms),
            None => FrameRequest::Idle,
        };
        if !self.has_face() || self.mask.is_none() {
            return timers;
        }
        let own = match self.director.phase() {
            Phase::Revealing if self.gate.can_run() => FrameRequest::NextFrame,
            Phase::Breathing if self.gate.intersecting() => self.breath.power().next_request(),
            _ => FrameRequest::Idle,
        };
        own.merge(timers)
    }

    fn fire_complete(&mut self) {
        tracing::debug!("reveal completion hook fired");
        if let Some(f) = self.on_complete.as_mut() {
            f();
        }
    }

    /// Tear down: cancel every timeout and drop all frame state. Later ticks are idle.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.timers.cancel_all();
        self.pending_size = None;
        self.start_pending = false;
        self.breath.stop();
        self.director.stop();
        self.field.pointer_leave();
        self.mask = None;
        self.surface = None;
        self.emitters = EmitterSet::default();
        self.on_complete = None;
        tracing::debug!("headline destroyed");
    }
}

#[cfg(test)]
#[path = "../tests/unit/headline.rs"]
mod tests;
