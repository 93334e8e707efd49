use vello_cpu::kurbo::Affine;

use crate::foundation::core::{CssSize, Point, Rect};
use crate::mask::feather::feather_alpha;
use crate::mask::metrics::{ASCENT_EM, FontSpec, GlyphPainter, LineLayout, TextMetrics};

/// Device-pixel-ratio bounds applied to every mask.
pub const DPR_RANGE: (f64, f64) = (1.0, 2.0);

/// Inputs that fully determine a mask. Two equal inputs produce byte-identical masks.
#[derive(Clone, Debug, PartialEq)]
pub struct MaskInputs {
    /// Newline-delimited headline text.
    pub text: String,
    /// Host container size in CSS px. A non-positive height is derived from the text block.
    pub container: CssSize,
    /// Raw device pixel ratio; clamped to [`DPR_RANGE`].
    pub device_pixel_ratio: f64,
    /// Edge feather radius in CSS px.
    pub feather_px: f64,
}

/// Offscreen alpha mask of the headline at device-pixel resolution.
#[derive(Clone, Debug)]
pub struct GlyphMask {
    width: u32,
    height: u32,
    dpr: f64,
    css: CssSize,
    rgba8_premul: Vec<u8>,
    lines: Vec<LineLayout>,
    font: FontSpec,
    ink: Option<Rect>,
}

impl GlyphMask {
    /// Width in device pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in device pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Clamped device pixel ratio the mask was built at.
    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    /// Size of the mask in CSS px.
    pub fn css_size(&self) -> CssSize {
        self.css
    }

    /// Premultiplied white-on-transparent pixels, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.rgba8_premul
    }

    /// Per-line layout (baselines and character centers) in CSS px.
    pub fn lines(&self) -> &[LineLayout] {
        &self.lines
    }

    /// Font the mask was laid out with, after fallbacks.
    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    /// Bounding box of every non-transparent pixel, in CSS px.
    pub fn ink_bounds(&self) -> Option<Rect> {
        self.ink
    }

    fn texel(&self, x: i64, y: i64) -> f64 {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return 0.0;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4 + 3;
        f64::from(self.rgba8_premul[i]) / 255.0
    }

    /// Bilinear alpha in `[0, 1]` at a CSS-space position. Outside the mask reads as 0.
    pub fn alpha_at(&self, p: Point) -> f64 {
        if !p.x.is_finite() || !p.y.is_finite() {
            return 0.0;
        }
        let fx = p.x * self.dpr - 0.5;
        let fy = p.y * self.dpr - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);
        let a = self.texel(x0, y0);
        let b = self.texel(x0 + 1, y0);
        let c = self.texel(x0, y0 + 1);
        let d = self.texel(x0 + 1, y0 + 1);
        let top = a + (b - a) * tx;
        let bottom = c + (d - c) * tx;
        top + (bottom - top) * ty
    }
}

/// Clamp a raw device pixel ratio into [`DPR_RANGE`]. Non-finite input maps to 1.
pub fn clamp_dpr(dpr: f64) -> f64 {
    if dpr.is_finite() {
        dpr.clamp(DPR_RANGE.0, DPR_RANGE.1)
    } else {
        DPR_RANGE.0
    }
}

/// Lay out `text` line by line, centered in `container`.
///
/// Character positions come from the provider's measured advances; missing or malformed
/// measurements fall back to fixed advances so positions are always finite.
pub fn layout_lines(
    text: &str,
    metrics: &mut dyn TextMetrics,
    font: &FontSpec,
    container: CssSize,
) -> Vec<LineLayout> {
    let rows: Vec<&str> = text.split('\n').map(|l| l.trim_end_matches('\r')).collect();
    let line_box = font.line_box_px();
    let block_h = line_box * rows.len() as f64;
    let top = (container.height - block_h) * 0.5;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let n = row.chars().count();
            let advances = metrics
                .char_advances(row, font)
                .filter(|a| a.len() == n && a.iter().all(|v| v.is_finite() && *v >= 0.0))
                .unwrap_or_else(|| vec![font.fallback_advance_px(); n]);
            let width: f64 = advances.iter().sum();
            let origin_x = (container.width - width) * 0.5;

            let mut char_x = Vec::with_capacity(n);
            let mut char_centers = Vec::with_capacity(n);
            let mut pen = origin_x;
            for adv in &advances {
                char_x.push(pen);
                char_centers.push(pen + adv * 0.5);
                pen += adv;
            }

            let line_top = top + line_box * i as f64;
            let baseline_y = line_top + (line_box - font.size_px) * 0.5 + font.size_px * ASCENT_EM;
            LineLayout {
                text: (*row).to_string(),
                origin_x,
                baseline_y,
                char_x,
                char_centers,
                width,
            }
        })
        .collect()
}

/// Rasterize the headline into a fresh [`GlyphMask`].
///
/// Returns `None` when the container has no usable width; the caller retries on the next
/// layout signal.
#[tracing::instrument(skip(metrics, painter), fields(chars = inputs.text.len()))]
pub fn build_mask(
    inputs: &MaskInputs,
    metrics: &mut dyn TextMetrics,
    painter: &mut dyn GlyphPainter,
) -> Option<GlyphMask> {
    let width = inputs.container.width;
    if !width.is_finite() || width <= 0.0 {
        tracing::debug!(width, "mask build deferred: container has no width");
        return None;
    }

    let font = metrics.font().unwrap_or_default().sanitized();
    let mut css = inputs.container;
    if !css.height.is_finite() || css.height <= 0.0 {
        let rows = inputs.text.split('\n').count() as f64;
        css.height = font.line_box_px() * rows + font.size_px * 0.5;
    }

    let dpr = clamp_dpr(inputs.device_pixel_ratio);
    let dev_w = (css.width * dpr).ceil().clamp(1.0, f64::from(u16::MAX)) as u16;
    let dev_h = (css.height * dpr).ceil().clamp(1.0, f64::from(u16::MAX)) as u16;

    let lines = layout_lines(&inputs.text, metrics, &font, css);

    let mut ctx = vello_cpu::RenderContext::new(dev_w, dev_h);
    let base = Affine::scale(dpr);
    for line in &lines {
        painter.paint_line(&mut ctx, line, &font, base);
    }
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(dev_w, dev_h);
    ctx.render_to_pixmap(&mut pixmap);

    let (w, h) = (u32::from(dev_w), u32::from(dev_h));
    let alpha: Vec<u8> = pixmap
        .data_as_u8_slice()
        .chunks_exact(4)
        .map(|px| px[3])
        .collect();
    let feather = if inputs.feather_px.is_finite() {
        (inputs.feather_px.max(0.0) * dpr).round() as u32
    } else {
        0
    };
    let alpha = feather_alpha(&alpha, w, h, feather);

    let mut rgba8_premul = Vec::with_capacity(alpha.len() * 4);
    let (mut x0, mut y0, mut x1, mut y1) = (u32::MAX, u32::MAX, 0u32, 0u32);
    for (i, &a) in alpha.iter().enumerate() {
        rgba8_premul.extend_from_slice(&[a, a, a, a]);
        if a > 0 {
            let (x, y) = (i as u32 % w, i as u32 / w);
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x + 1);
            y1 = y1.max(y + 1);
        }
    }
    let ink = (x0 < x1).then(|| {
        Rect::new(
            f64::from(x0) / dpr,
            f64::from(y0) / dpr,
            f64::from(x1) / dpr,
            f64::from(y1) / dpr,
        )
    });

    tracing::debug!(w, h, dpr, lines = lines.len(), "glyph mask built");
    Some(GlyphMask {
        width: w,
        height: h,
        dpr,
        css,
        rgba8_premul,
        lines,
        font,
        ink,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/mask/builder.rs"]
mod tests;
