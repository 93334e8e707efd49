//! Tuning knobs for the reveal and breathing effects.
//!
//! Every section deserializes with defaults, so a JSON config only needs the keys it
//! overrides.

use serde::{Deserialize, Serialize};

use crate::animation::ease::Ease;
use crate::foundation::core::Rgb8;
use crate::foundation::error::{RevealError, RevealResult};

/// Horizontal sweep direction of the reveal fill wave.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillDirection {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
    /// Symmetric, from the center outwards.
    Center,
}

/// Two-color palette shared by the reveal and breathing tiles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Tint of fast-moving ("active") tiles.
    pub active: Rgb8,
    /// Tint of settled ("placed") tiles.
    pub placed: Rgb8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            active: Rgb8::new(124, 92, 255),
            placed: Rgb8::new(24, 22, 34),
        }
    }
}

/// Particle pool sizing and force constants. Speeds are CSS px per 60 Hz frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Pool capacity on wide viewports.
    pub count_desktop: usize,
    /// Pool capacity on narrow viewports.
    pub count_mobile: usize,
    /// Viewport width (CSS px) below which the mobile count applies.
    pub mobile_breakpoint_px: f64,
    /// Emitter sampling step in CSS px.
    pub sample_step_px: f64,
    /// Edge feather of the glyph mask in CSS px.
    pub feather_px: f64,
    /// Tangential acceleration along glyph contours.
    pub orbit_speed: f64,
    /// Normal acceleration pulling tiles back onto the contour.
    pub edge_glue: f64,
    /// Amplitude of the sinusoidal drift.
    pub noise_amp: f64,
    /// Per-frame velocity retention in `(0, 1]`.
    pub damping: f64,
    /// Speed clamp.
    pub max_speed: f64,
    /// Lower bound of a fresh particle's life.
    pub life_min_ms: f64,
    /// Upper bound of a fresh particle's life.
    pub life_max_ms: f64,
    /// Fraction of the pool integrated per frame, in `(0, 1]`.
    pub update_budget: f64,
    /// Soft-bounds margin around the surface.
    pub bounds_margin_px: f64,
    /// Respawn jitter radius.
    pub jitter_px: f64,
    /// Seed for respawn jitter and lifetimes.
    pub seed: u64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count_desktop: 1600,
            count_mobile: 700,
            mobile_breakpoint_px: 768.0,
            sample_step_px: 3.0,
            feather_px: 2.0,
            orbit_speed: 0.9,
            edge_glue: 0.6,
            noise_amp: 0.05,
            damping: 0.92,
            max_speed: 2.6,
            life_min_ms: 1400.0,
            life_max_ms: 3200.0,
            update_budget: 1.0,
            bounds_margin_px: 40.0,
            jitter_px: 2.0,
            seed: 0x7115_5EED,
        }
    }
}

/// Pointer brush that pushes tiles away and leaves respawn "holes" behind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    /// Brush radius in CSS px.
    pub brush_radius_px: f64,
    /// Scales the repulsion falloff, in `(0, 1]`.
    pub hardness: f64,
    /// Lifetime of a hole left by the pointer.
    pub cooldown_ms: f64,
    /// Outward repulsion acceleration at the brush center.
    pub repel: f64,
    /// Fraction of the repulsion redirected along the contour tangent.
    pub slide: f64,
    /// Extra life drained per elapsed ms at full repulsion strength.
    pub life_drain: f64,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            brush_radius_px: 70.0,
            hardness: 0.8,
            cooldown_ms: 450.0,
            repel: 1.6,
            slide: 0.5,
            life_drain: 6.0,
        }
    }
}

/// Timing and look of the main reveal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealTiming {
    /// Reveal length after the delay.
    pub duration_ms: f64,
    /// Idle time before progress starts advancing.
    pub delay_ms: f64,
    /// Curve applied to tile size and color settling.
    pub ease: Ease,
    /// Fill wave direction.
    pub direction: FillDirection,
    /// Coarse tile size at progress 0.
    pub tile_start_px: f64,
    /// Fine tile size at progress 1 (also the breathing grid pitch).
    pub tile_end_px: f64,
    /// Fraction of the pool drawn at progress 0.
    pub density_start: f64,
    /// Progress at which DOM text starts fading in.
    pub dom_reveal_start: f64,
    /// Progress at which the destination-out residue erase starts.
    pub residue_fade_start: f64,
    /// Wait between completion and the breathing overlay.
    pub breath_start_delay_ms: f64,
    /// Restart the reveal when the pointer enters a finished headline.
    pub retrigger_on_hover: bool,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            duration_ms: 2600.0,
            delay_ms: 150.0,
            ease: Ease::OutCubic,
            direction: FillDirection::Ltr,
            tile_start_px: 9.0,
            tile_end_px: 3.0,
            density_start: 0.35,
            dom_reveal_start: 0.83,
            residue_fade_start: 0.9,
            breath_start_delay_ms: 600.0,
            retrigger_on_hover: false,
        }
    }
}

/// Idle breathing overlay.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreathConfig {
    /// Base oscillation period.
    pub period_ms: f64,
    /// Fraction of alpha/size that oscillates, in `[0, 1]`.
    pub amplitude: f64,
    /// Strength of the spatial phase drift across the headline.
    pub drift: f64,
    /// Peak tile alpha.
    pub base_alpha: f64,
    /// Maximum positional wobble in CSS px.
    pub wobble_px: f64,
    /// Length of the global intro ramp.
    pub intro_ms: f64,
    /// Per-tile fade-in once its intro key is crossed.
    pub tile_ramp_ms: f64,
    /// Frame gap that switches to low-power rendering.
    pub low_power_gap_ms: f64,
    /// Timeout between low-power renders.
    pub low_power_interval_ms: f64,
}

impl Default for BreathConfig {
    fn default() -> Self {
        Self {
            period_ms: 4200.0,
            amplitude: 0.45,
            drift: 0.9,
            base_alpha: 0.32,
            wobble_px: 0.8,
            intro_ms: 3200.0,
            tile_ramp_ms: 480.0,
            low_power_gap_ms: 400.0,
            low_power_interval_ms: 1000.0,
        }
    }
}

/// Frame pacing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Quiet period before a resize triggers a rebuild.
    pub resize_debounce_ms: f64,
    /// Smoothed frame interval above which the update budget shrinks.
    pub slow_frame_ms: f64,
    /// Smoothed frame interval below which the update budget grows back.
    pub fast_frame_ms: f64,
    /// Floor of the adaptive update budget.
    pub min_update_budget: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            resize_debounce_ms: 90.0,
            slow_frame_ms: 22.0,
            fast_frame_ms: 18.0,
            min_update_budget: 0.25,
        }
    }
}

/// Complete configuration of one headline instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Tile colors.
    pub palette: Palette,
    /// Particle pool.
    pub field: FieldConfig,
    /// Pointer brush.
    pub pointer: PointerConfig,
    /// Main reveal.
    pub reveal: RevealTiming,
    /// Idle overlay.
    pub breath: BreathConfig,
    /// Frame pacing.
    pub schedule: ScheduleConfig,
}

impl RevealConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json_str(s: &str) -> RevealResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject non-finite or out-of-range knobs.
    pub fn validate(&self) -> RevealResult<()> {
        fn positive(name: &str, v: f64) -> RevealResult<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(RevealError::validation(format!("{name} must be finite and > 0")))
            }
        }
        fn non_negative(name: &str, v: f64) -> RevealResult<()> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(RevealError::validation(format!("{name} must be finite and >= 0")))
            }
        }
        fn unit(name: &str, v: f64) -> RevealResult<()> {
            if v.is_finite() && (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(RevealError::validation(format!("{name} must be in [0, 1]")))
            }
        }

        let f = &self.field;
        if f.count_desktop == 0 || f.count_mobile == 0 {
            return Err(RevealError::validation("particle counts must be > 0"));
        }
        positive("field.sample_step_px", f.sample_step_px)?;
        non_negative("field.feather_px", f.feather_px)?;
        non_negative("field.mobile_breakpoint_px", f.mobile_breakpoint_px)?;
        non_negative("field.orbit_speed", f.orbit_speed)?;
        non_negative("field.edge_glue", f.edge_glue)?;
        non_negative("field.noise_amp", f.noise_amp)?;
        positive("field.damping", f.damping)?;
        unit("field.damping", f.damping)?;
        positive("field.max_speed", f.max_speed)?;
        positive("field.life_min_ms", f.life_min_ms)?;
        positive("field.life_max_ms", f.life_max_ms)?;
        if f.life_max_ms < f.life_min_ms {
            return Err(RevealError::validation(
                "field.life_max_ms must be >= field.life_min_ms",
            ));
        }
        positive("field.update_budget", f.update_budget)?;
        unit("field.update_budget", f.update_budget)?;
        non_negative("field.bounds_margin_px", f.bounds_margin_px)?;
        non_negative("field.jitter_px", f.jitter_px)?;

        let p = &self.pointer;
        positive("pointer.brush_radius_px", p.brush_radius_px)?;
        unit("pointer.hardness", p.hardness)?;
        non_negative("pointer.cooldown_ms", p.cooldown_ms)?;
        non_negative("pointer.repel", p.repel)?;
        unit("pointer.slide", p.slide)?;
        non_negative("pointer.life_drain", p.life_drain)?;

        let r = &self.reveal;
        positive("reveal.duration_ms", r.duration_ms)?;
        non_negative("reveal.delay_ms", r.delay_ms)?;
        positive("reveal.tile_start_px", r.tile_start_px)?;
        positive("reveal.tile_end_px", r.tile_end_px)?;
        unit("reveal.density_start", r.density_start)?;
        unit("reveal.dom_reveal_start", r.dom_reveal_start)?;
        unit("reveal.residue_fade_start", r.residue_fade_start)?;
        non_negative("reveal.breath_start_delay_ms", r.breath_start_delay_ms)?;

        let b = &self.breath;
        positive("breath.period_ms", b.period_ms)?;
        unit("breath.amplitude", b.amplitude)?;
        non_negative("breath.drift", b.drift)?;
        unit("breath.base_alpha", b.base_alpha)?;
        non_negative("breath.wobble_px", b.wobble_px)?;
        non_negative("breath.intro_ms", b.intro_ms)?;
        non_negative("breath.tile_ramp_ms", b.tile_ramp_ms)?;
        positive("breath.low_power_gap_ms", b.low_power_gap_ms)?;
        positive("breath.low_power_interval_ms", b.low_power_interval_ms)?;

        let s = &self.schedule;
        non_negative("schedule.resize_debounce_ms", s.resize_debounce_ms)?;
        positive("schedule.slow_frame_ms", s.slow_frame_ms)?;
        positive("schedule.fast_frame_ms", s.fast_frame_ms)?;
        if s.fast_frame_ms > s.slow_frame_ms {
            return Err(RevealError::validation(
                "schedule.fast_frame_ms must be <= schedule.slow_frame_ms",
            ));
        }
        positive("schedule.min_update_budget", s.min_update_budget)?;
        unit("schedule.min_update_budget", s.min_update_budget)?;

        Ok(())
    }

    /// Particle pool capacity for a viewport of the given CSS width.
    pub fn particle_count(&self, viewport_width: f64) -> usize {
        if viewport_width.is_finite() && viewport_width < self.field.mobile_breakpoint_px {
            self.field.count_mobile
        } else {
            self.field.count_desktop
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
