use serde::{Deserialize, Serialize};

pub use kurbo::{Point, Rect, Vec2};

/// Size of the host container in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CssSize {
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
}

impl CssSize {
    /// Construct a size from width/height in CSS pixels.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Return `true` when both axes are finite and strictly positive.
    pub fn is_renderable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Geometric center of the box.
    pub fn center(self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Straight (non-premultiplied) RGB brand color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Construct a color from channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear blend between `self` (t = 0) and `other` (t = 1). `t` is clamped.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }

    /// Premultiply against a straight alpha in `[0, 1]`.
    pub fn with_alpha(self, alpha: f64) -> Rgba8Premul {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, a)
    }
}

impl<'de> Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Arr([u8; 3]),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::Arr([r, g, b]) => Ok(Self::new(r, g, b)),
        }
    }
}

fn parse_hex(s: &str) -> Result<Rgb8, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 || !s.is_ascii() {
        return Err("hex color must be #RRGGBB (case-insensitive)".to_owned());
    }

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    Ok(Rgb8::new(
        hex_byte(&s[0..2])?,
        hex_byte(&s[2..4])?,
        hex_byte(&s[4..6])?,
    ))
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba8Premul {
    /// Red channel, premultiplied.
    pub r: u8,
    /// Green channel, premultiplied.
    pub g: u8,
    /// Blue channel, premultiplied.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Premultiply a straight RGBA8 color.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
