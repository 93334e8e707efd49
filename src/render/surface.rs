//! CPU raster target the tiles are drawn into.

use vello_cpu::kurbo::Affine;

use crate::foundation::core::{CssSize, Point, Rgb8};
use crate::foundation::math::mul_div255_u8;
use crate::mask::builder::clamp_dpr;

/// One rendered frame of the tile layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Convert premultiplied data to straight alpha in place.
    pub fn unpremultiply(&mut self) {
        if !self.premultiplied {
            return;
        }
        for px in self.data.chunks_exact_mut(4) {
            let a = px[3];
            if a == 0 {
                px[..3].fill(0);
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + u16::from(a) / 2) / u16::from(a)).min(255) as u8;
            }
        }
        self.premultiplied = false;
    }

    /// Sum of the alpha channel.
    pub fn alpha_sum(&self) -> u64 {
        self.data.chunks_exact(4).map(|px| u64::from(px[3])).sum()
    }
}

/// A square tile queued for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    /// Center in CSS px.
    pub center: Point,
    /// Edge length in CSS px.
    pub size: f64,
    /// Straight color.
    pub color: Rgb8,
    /// Straight alpha in `[0, 1]`.
    pub alpha: f64,
}

/// Device-resolution tile canvas, cleared and redrawn every frame.
pub struct TileSurface {
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    css: CssSize,
    dpr: f64,
    width: u16,
    height: u16,
}

impl std::fmt::Debug for TileSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileSurface")
            .field("css", &self.css)
            .field("dpr", &self.dpr)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl TileSurface {
    /// Allocate a surface for `css` at `dpr`; `None` when the size is not renderable.
    pub fn new(css: CssSize, dpr: f64) -> Option<Self> {
        if !css.is_renderable() {
            return None;
        }
        let dpr = clamp_dpr(dpr);
        let width = (css.width * dpr).ceil().clamp(1.0, f64::from(u16::MAX)) as u16;
        let height = (css.height * dpr).ceil().clamp(1.0, f64::from(u16::MAX)) as u16;
        Some(Self {
            ctx: vello_cpu::RenderContext::new(width, height),
            pixmap: vello_cpu::Pixmap::new(width, height),
            css,
            dpr,
            width,
            height,
        })
    }

    /// CSS size.
    pub fn css_size(&self) -> CssSize {
        self.css
    }

    /// Clamped device pixel ratio.
    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    /// Width in device pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Height in device pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Clear to transparent.
    pub fn clear(&mut self) {
        self.pixmap.data_as_u8_slice_mut().fill(0);
    }

    /// Replace the surface contents with `tiles`.
    pub fn draw_tiles(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        self.ctx.reset();
        self.ctx.set_transform(Affine::scale(self.dpr));
        let mut drawn = 0usize;
        for t in tiles {
            let a = (t.alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
            if a == 0 || !(t.size.is_finite() && t.size > 0.0) {
                continue;
            }
            let half = t.size * 0.5;
            self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                t.color.r, t.color.g, t.color.b, a,
            ));
            self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                t.center.x - half,
                t.center.y - half,
                t.center.x + half,
                t.center.y + half,
            ));
            drawn += 1;
        }
        self.ctx.flush();
        self.clear();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        tracing::trace!(drawn, "tiles drawn");
    }

    /// Destination-out erase: every pixel keeps `keep` of its coverage.
    pub fn destination_out(&mut self, keep: f64) {
        if !keep.is_finite() || keep >= 1.0 {
            return;
        }
        if keep <= 0.0 {
            self.clear();
            return;
        }
        let k = (keep * 255.0).round() as u16;
        for c in self.pixmap.data_as_u8_slice_mut() {
            *c = mul_div255_u8(u16::from(*c), k);
        }
    }

    /// Premultiplied pixel bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Copy the current contents out.
    pub fn read_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.width(),
            height: self.height(),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
