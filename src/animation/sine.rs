//! Process-wide sine lookup table used by the breathing overlay.

use std::sync::LazyLock;

const LUT_BITS: u32 = 10;
const LUT_SIZE: usize = 1 << LUT_BITS;

// One extra entry so interpolation at the last slot never wraps.
static SINE_LUT: LazyLock<Vec<f32>> = LazyLock::new(|| {
    (0..=LUT_SIZE)
        .map(|i| (std::f64::consts::TAU * i as f64 / LUT_SIZE as f64).sin() as f32)
        .collect()
});

/// Approximate `sin(x)` for any finite `x` via linear interpolation in the table.
///
/// Non-finite input returns `0.0`.
pub fn fast_sin(x: f64) -> f64 {
    if !x.is_finite() {
        return 0.0;
    }
    let turns = x / std::f64::consts::TAU;
    let frac = turns - turns.floor();
    let pos = frac * LUT_SIZE as f64;
    let i = (pos as usize).min(LUT_SIZE - 1);
    let t = pos - i as f64;
    let lut = &*SINE_LUT;
    let a = f64::from(lut[i]);
    let b = f64::from(lut[i + 1]);
    a + (b - a) * t
}

/// Approximate `cos(x)` through [`fast_sin`].
pub fn fast_cos(x: f64) -> f64 {
    fast_sin(x + std::f64::consts::FRAC_PI_2)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/sine.rs"]
mod tests;
