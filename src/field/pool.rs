use crate::animation::sine::{fast_cos, fast_sin};
use crate::config::{FieldConfig, PointerConfig};
use crate::field::holes::{Hole, HoleList};
use crate::field::particle::{MotionMode, Particle};
use crate::foundation::core::{CssSize, Point, Rect, Vec2};
use crate::foundation::math::{Rng64, clamp01};
use crate::mask::builder::GlyphMask;
use crate::mask::sampler::{EmitterPoint, EmitterSet, probe};

/// Length of one nominal frame; force constants are tuned per 60 Hz frame.
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Longest step integrated at once, in nominal frames.
const MAX_STEP_FRAMES: f64 = 4.0;
/// Hole radius as a fraction of the brush radius.
pub const HOLE_RADIUS_SCALE: f64 = 0.6;
/// Pointer travel (fraction of brush radius) before a new hole is appended.
const HOLE_SPACING_SCALE: f64 = 0.25;

/// Fixed-capacity pool of tile particles orbiting the glyph contours.
///
/// Slots are index-stable: the pool never grows or shrinks after construction, and every
/// respawn rewrites its slot in place.
#[derive(Clone, Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    cfg: FieldConfig,
    pointer_cfg: PointerConfig,
    bounds: Rect,
    center: Point,
    rng: Rng64,
    holes: HoleList,
    pointer: Option<Point>,
    stride: usize,
    frame: u64,
}

impl ParticleField {
    /// Create a pool of `capacity` dormant particles.
    pub fn new(capacity: usize, cfg: FieldConfig, pointer_cfg: PointerConfig) -> Self {
        Self {
            particles: vec![Particle::parked(Point::ZERO); capacity.max(1)],
            cfg,
            pointer_cfg,
            bounds: Rect::ZERO,
            center: Point::ZERO,
            rng: Rng64::new(cfg.seed),
            holes: HoleList::default(),
            pointer: None,
            stride: 1,
            frame: 0,
        }
    }

    /// All slots, dormant ones included.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Pointer holes currently retained.
    pub fn holes(&self) -> &HoleList {
        &self.holes
    }

    /// Soft bounds: the surface expanded by the configured margin.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Current update stride (1 = every particle every frame).
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Integrate only `fraction` of the pool per frame.
    pub fn set_update_budget(&mut self, fraction: f64) {
        let f = if fraction.is_finite() {
            fraction.clamp(0.05, 1.0)
        } else {
            1.0
        };
        self.stride = (1.0 / f).ceil().max(1.0) as usize;
    }

    /// Respawn every slot against a freshly built mask.
    ///
    /// Lives are randomized so expiries stay desynchronized; spawn times are staggered back
    /// in time so the first frame is not a uniform fade-in.
    pub fn reseed(&mut self, emitters: &EmitterSet, size: CssSize, now_ms: f64) {
        let m = self.cfg.bounds_margin_px;
        self.bounds = Rect::new(-m, -m, size.width + m, size.height + m);
        self.center = size.center();
        for i in 0..self.particles.len() {
            self.respawn(i, emitters, now_ms);
            let age = self.rng.range(0.0, self.particles[i].max_life_ms * 0.5);
            self.particles[i].born_at_ms -= age;
        }
        tracing::debug!(
            count = self.particles.len(),
            edge = emitters.edge.len(),
            "particle field reseeded"
        );
    }

    /// Switch every orbiting particle to fade-out; expired ones go dormant.
    pub fn begin_fade_out(&mut self) {
        for p in &mut self.particles {
            if p.mode == MotionMode::Orbit {
                p.mode = MotionMode::FadeOut;
            }
        }
    }

    /// Return every slot to orbit, respawning dormant ones.
    pub fn wake(&mut self, emitters: &EmitterSet, now_ms: f64) {
        for i in 0..self.particles.len() {
            match self.particles[i].mode {
                MotionMode::Dormant => self.respawn(i, emitters, now_ms),
                MotionMode::FadeOut => self.particles[i].mode = MotionMode::Orbit,
                MotionMode::Orbit => {}
            }
        }
    }

    /// Track the pointer and leave a respawn hole behind it.
    pub fn pointer_move(&mut self, p: Point, now_ms: f64) {
        if !p.x.is_finite() || !p.y.is_finite() {
            return;
        }
        self.pointer = Some(p);
        let radius = self.pointer_cfg.brush_radius_px;
        let spacing = radius * HOLE_SPACING_SCALE;
        let fresh = match self.holes.last() {
            Some(h) => (h.center - p).hypot() >= spacing || !h.is_active(now_ms),
            None => true,
        };
        if fresh {
            self.holes.prune(now_ms);
            self.holes.push(Hole {
                center: p,
                radius: radius * HOLE_RADIUS_SCALE,
                expires_at_ms: now_ms + self.pointer_cfg.cooldown_ms,
            });
        }
    }

    /// Forget the pointer; existing holes expire on their own.
    pub fn pointer_leave(&mut self) {
        self.pointer = None;
    }

    /// Append a hole directly.
    pub fn push_hole(&mut self, hole: Hole) {
        self.holes.push(hole);
    }

    /// Advance the particles selected by this frame's stride by `dt_ms`.
    ///
    /// The mask and emitters are only read. Every touched particle ends the call inside the
    /// soft bounds with non-negative life, or has been respawned.
    pub fn step(&mut self, mask: &GlyphMask, emitters: &EmitterSet, now_ms: f64, dt_ms: f64) {
        let dt = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        let stride = self.stride.max(1);
        let slot_dt = dt * stride as f64;
        let f = (slot_dt / FRAME_MS).min(MAX_STEP_FRAMES * stride as f64);
        let frame = self.frame;
        self.frame = self.frame.wrapping_add(1);

        for i in 0..self.particles.len() {
            if (i as u64 + frame) % stride as u64 != 0 {
                continue;
            }
            if !self.particles[i].is_live() {
                continue;
            }
            self.integrate(i, mask, now_ms, slot_dt, f);
            let p = &self.particles[i];
            if p.life_ms <= 0.0 || !self.bounds.contains(p.pos) {
                self.expire(i, emitters, now_ms);
            }
        }
    }

    fn integrate(&mut self, i: usize, mask: &GlyphMask, now_ms: f64, dt: f64, f: f64) {
        let cfg = self.cfg;
        let pc = self.pointer_cfg;
        let pointer = self.pointer;
        let p = &mut self.particles[i];

        let pr = probe(mask, p.pos);
        let band = (1.0 - (pr.alpha - 0.5).abs() / 0.5).max(0.0);
        let strength = clamp01(band * pr.magnitude * 4.0);
        let tangent = pr.tangent();

        let mut acc = tangent * (cfg.orbit_speed * strength);
        let toward_contour = if pr.alpha < 0.5 { 1.0 } else { -1.0 };
        acc += pr.dir * (cfg.edge_glue * strength * toward_contour);

        let t = now_ms * 0.001;
        acc += Vec2::new(
            fast_sin(t * 1.3 + p.noise_seed),
            fast_cos(t * 1.1 + p.noise_seed * 1.7),
        ) * cfg.noise_amp;

        if let Some(ptr) = pointer {
            let d = p.pos - ptr;
            let dist = d.hypot();
            let r = pc.brush_radius_px;
            if dist < r {
                let k = pc.hardness * (1.0 - dist / r);
                let out = if dist > 1e-6 {
                    d / dist
                } else {
                    Vec2::new(1.0, 0.0)
                };
                let slide = if tangent == Vec2::ZERO {
                    Vec2::new(-out.y, out.x)
                } else {
                    tangent
                };
                acc += out * (pc.repel * k);
                acc += slide * (pc.repel * pc.slide * k);
                p.life_ms -= k * pc.life_drain * dt;
            }
        }

        p.vel = (p.vel + acc * f) * cfg.damping.powf(f);
        let speed = p.vel.hypot();
        if speed > cfg.max_speed {
            p.vel = p.vel * (cfg.max_speed / speed);
        }
        p.pos += p.vel * f;
        p.life_ms -= dt;
        if !p.pos.x.is_finite() || !p.pos.y.is_finite() {
            p.life_ms = 0.0;
        }
    }

    fn expire(&mut self, i: usize, emitters: &EmitterSet, now_ms: f64) {
        match self.particles[i].mode {
            MotionMode::Orbit => self.respawn(i, emitters, now_ms),
            MotionMode::FadeOut | MotionMode::Dormant => {
                let (site, _) = self.pick_site(emitters, now_ms);
                self.particles[i] = Particle::parked(site);
            }
        }
    }

    /// Rewrite slot `i` with a fresh orbiting particle.
    ///
    /// A respawned particle carries nothing over from its previous life.
    pub fn respawn(&mut self, i: usize, emitters: &EmitterSet, now_ms: f64) {
        if i >= self.particles.len() {
            return;
        }
        let (pos, tangent) = self.pick_site(emitters, now_ms);
        let speed = self.cfg.orbit_speed * self.rng.range(0.4, 1.0);
        let life = self.rng.range(self.cfg.life_min_ms, self.cfg.life_max_ms);
        self.particles[i] = Particle {
            pos,
            vel: tangent * speed,
            size: self.rng.range(0.85, 1.15),
            life_ms: life,
            max_life_ms: life,
            born_at_ms: now_ms,
            noise_seed: self.rng.range(0.0, std::f64::consts::TAU),
            mode: MotionMode::Orbit,
        };
    }

    /// Choose a respawn site and its orbit tangent.
    ///
    /// Edge points are preferred, interior points are the fallback and the surface center
    /// the last resort. Sites inside an active hole are never returned while any other
    /// candidate exists.
    fn pick_site(&mut self, emitters: &EmitterSet, now_ms: f64) -> (Point, Vec2) {
        for set in [&emitters.edge, &emitters.interior] {
            if set.is_empty() {
                continue;
            }
            for _ in 0..2 {
                let site = set[self.rng.index(set.len())];
                let pos = self.jitter(site.pos);
                if !self.holes.blocks(pos, now_ms) {
                    return (pos, site.probe.tangent());
                }
            }
            if let Some(site) = self.first_open(set, now_ms) {
                return (site.pos, site.probe.tangent());
            }
        }
        (self.center, Vec2::ZERO)
    }

    fn first_open(&mut self, set: &[EmitterPoint], now_ms: f64) -> Option<EmitterPoint> {
        let start = self.rng.index(set.len());
        (0..set.len())
            .map(|k| set[(start + k) % set.len()])
            .find(|p| !self.holes.blocks(p.pos, now_ms))
    }

    fn jitter(&mut self, p: Point) -> Point {
        let j = self.cfg.jitter_px;
        let q = Point::new(p.x + self.rng.range(-j, j), p.y + self.rng.range(-j, j));
        if self.bounds.contains(q) { q } else { p }
    }
}

/// Blend factor between the placed and active colors for a given speed.
pub fn speed_mix(speed: f64, max_speed: f64) -> f64 {
    if max_speed <= 0.0 {
        return 0.0;
    }
    clamp01(speed / max_speed)
}

#[cfg(test)]
#[path = "../../tests/unit/field/pool.rs"]
mod tests;
