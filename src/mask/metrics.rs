//! Font metrics capability consumed by the mask builder.
//!
//! The host owns the live text element; the engine only asks it for a font description and
//! per-character advances, and asks a painter to put glyphs on the mask surface.

use vello_cpu::kurbo::{Affine, RoundedRect, Shape};

/// Font description as read from the live text element.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FontSpec {
    /// CSS font family.
    pub family: String,
    /// CSS font weight (100..=900).
    pub weight: u16,
    /// Font size in CSS px.
    pub size_px: f64,
    /// Line height as a multiple of `size_px`.
    pub line_height: f64,
    /// Extra spacing added after every character, in CSS px.
    pub letter_spacing_px: f64,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            weight: 700,
            size_px: 48.0,
            line_height: 1.1,
            letter_spacing_px: 0.0,
        }
    }
}

impl FontSpec {
    /// Replace non-finite or non-positive metrics with defaults.
    pub fn sanitized(mut self) -> Self {
        let d = Self::default();
        if !self.size_px.is_finite() || self.size_px <= 0.0 {
            self.size_px = d.size_px;
        }
        if !self.line_height.is_finite() || self.line_height <= 0.0 {
            self.line_height = d.line_height;
        }
        if !self.letter_spacing_px.is_finite() {
            self.letter_spacing_px = 0.0;
        }
        self
    }

    /// Line box height in CSS px.
    pub fn line_box_px(&self) -> f64 {
        self.size_px * self.line_height
    }

    /// Advance used when the provider cannot measure a character.
    pub fn fallback_advance_px(&self) -> f64 {
        self.size_px * FALLBACK_ADVANCE_EM + self.letter_spacing_px
    }
}

pub(crate) const FALLBACK_ADVANCE_EM: f64 = 0.56;
/// Baseline position below the top of the glyph area, as a fraction of the font size.
pub(crate) const ASCENT_EM: f64 = 0.8;

/// One laid-out text line in CSS px.
#[derive(Clone, Debug, PartialEq)]
pub struct LineLayout {
    /// Source text of the line.
    pub text: String,
    /// Left edge of the first character.
    pub origin_x: f64,
    /// Baseline Y.
    pub baseline_y: f64,
    /// Left edge of each character.
    pub char_x: Vec<f64>,
    /// Horizontal center of each character.
    pub char_centers: Vec<f64>,
    /// Total advance of the line.
    pub width: f64,
}

/// Synchronous font measurement provided by the host.
pub trait TextMetrics {
    /// Font of the live text element, or `None` when it is not mounted yet.
    fn font(&self) -> Option<FontSpec>;

    /// Advance of every `char` of `line` in CSS px, letter spacing included.
    ///
    /// Returning `None` (or a vector of the wrong length) makes the builder fall back to
    /// fixed advances.
    fn char_advances(&mut self, line: &str, font: &FontSpec) -> Option<Vec<f64>>;
}

/// Draws a laid-out line onto the mask raster in opaque white.
pub trait GlyphPainter {
    /// `base` maps CSS px to device px; painters compose their own offsets onto it.
    fn paint_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        line: &LineLayout,
        font: &FontSpec,
        base: Affine,
    );
}

/// Font-free face with fixed advances that paints every visible character as a rounded block.
///
/// Used when no font data is available and for deterministic tests.
#[derive(Clone, Debug, Default)]
pub struct BlockFace {
    font: FontSpec,
}

impl BlockFace {
    /// Construct a face reporting `font` as its metrics.
    pub fn new(font: FontSpec) -> Self {
        Self { font }
    }
}

impl TextMetrics for BlockFace {
    fn font(&self) -> Option<FontSpec> {
        Some(self.font.clone())
    }

    fn char_advances(&mut self, line: &str, font: &FontSpec) -> Option<Vec<f64>> {
        Some(vec![font.fallback_advance_px(); line.chars().count()])
    }
}

impl GlyphPainter for BlockFace {
    fn paint_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        line: &LineLayout,
        font: &FontSpec,
        base: Affine,
    ) {
        let cap = font.size_px * 0.7;
        let radius = font.size_px * 0.12;
        ctx.set_transform(base);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
        for (i, ch) in line.text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let (Some(&x), Some(&c)) = (line.char_x.get(i), line.char_centers.get(i)) else {
                continue;
            };
            let adv = (c - x) * 2.0 - font.letter_spacing_px.max(0.0);
            let inset = adv * 0.1;
            let rect = RoundedRect::new(
                x + inset,
                line.baseline_y - cap,
                x + adv - inset,
                line.baseline_y,
                radius,
            );
            ctx.fill_path(&rect.to_path(0.1));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mask/metrics.rs"]
mod tests;
