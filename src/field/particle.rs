use crate::foundation::core::{Point, Vec2};

/// Fade-in length of a freshly spawned tile.
pub const SPAWN_FADE_MS: f64 = 220.0;
/// Fade-out length at the end of a tile's life.
pub const EXPIRE_FADE_MS: f64 = 320.0;

/// What a particle is currently doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionMode {
    /// Orbiting the glyph contour; respawned when it expires.
    Orbit,
    /// Still integrated, but goes dormant instead of respawning.
    FadeOut,
    /// Parked on a valid site; neither integrated nor drawn.
    Dormant,
}

/// One tile of the reveal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Position in CSS px.
    pub pos: Point,
    /// Velocity in CSS px per 60 Hz frame.
    pub vel: Vec2,
    /// Size multiplier applied to the director's tile size.
    pub size: f64,
    /// Remaining life in ms.
    pub life_ms: f64,
    /// Life at spawn time.
    pub max_life_ms: f64,
    /// Spawn timestamp in ms.
    pub born_at_ms: f64,
    /// Phase offset of the noise drift.
    pub noise_seed: f64,
    /// Current motion mode.
    pub mode: MotionMode,
}

impl Particle {
    pub(crate) fn parked(pos: Point) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size: 1.0,
            life_ms: 0.0,
            max_life_ms: 0.0,
            born_at_ms: 0.0,
            noise_seed: 0.0,
            mode: MotionMode::Dormant,
        }
    }

    /// Current speed.
    pub fn speed(&self) -> f64 {
        self.vel.hypot()
    }

    /// `true` unless dormant.
    pub fn is_live(&self) -> bool {
        self.mode != MotionMode::Dormant
    }

    /// Opacity from the spawn and expiry fades, in `[0, 1]`.
    pub fn fade(&self, now_ms: f64) -> f64 {
        if !self.is_live() {
            return 0.0;
        }
        let fade_in = ((now_ms - self.born_at_ms) / SPAWN_FADE_MS).clamp(0.0, 1.0);
        let fade_out = (self.life_ms / EXPIRE_FADE_MS).clamp(0.0, 1.0);
        fade_in.min(fade_out)
    }
}
