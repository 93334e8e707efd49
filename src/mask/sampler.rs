use crate::foundation::core::{Point, Vec2};
use crate::foundation::math::{cell_hash, hash01};
use crate::mask::builder::GlyphMask;

/// Alpha window that counts as the glyph contour.
pub const EDGE_ALPHA: (f64, f64) = (0.3, 0.7);
/// Minimum gradient magnitude for an edge sample.
pub const EDGE_MIN_GRADIENT: f64 = 0.02;
/// Alpha at or above which a sample is interior.
pub const INTERIOR_ALPHA: f64 = 0.92;
/// Fraction of interior samples kept.
pub const INTERIOR_KEEP: f64 = 0.08;

const SALT_INTERIOR: u8 = 0x11;
const SALT_SEED: u8 = 0x22;

/// Local alpha field around a point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Probe {
    /// Alpha in `[0, 1]`.
    pub alpha: f64,
    /// Unit gradient pointing toward increasing alpha, or zero on flat ground.
    pub dir: Vec2,
    /// Gradient magnitude (alpha per CSS px).
    pub magnitude: f64,
}

impl Probe {
    /// Gradient rotated by 90°: the orbit direction along the contour.
    pub fn tangent(&self) -> Vec2 {
        Vec2::new(-self.dir.y, self.dir.x)
    }
}

/// Sample alpha and its central-difference gradient over the four axis neighbours.
pub fn probe(mask: &GlyphMask, p: Point) -> Probe {
    let h = 1.0;
    let alpha = mask.alpha_at(p);
    let l = mask.alpha_at(Point::new(p.x - h, p.y));
    let r = mask.alpha_at(Point::new(p.x + h, p.y));
    let u = mask.alpha_at(Point::new(p.x, p.y - h));
    let d = mask.alpha_at(Point::new(p.x, p.y + h));
    let raw = Vec2::new((r - l) * 0.5 / h, (d - u) * 0.5 / h);
    let magnitude = raw.hypot();
    let dir = if magnitude > 1e-9 {
        raw / magnitude
    } else {
        Vec2::ZERO
    };
    Probe {
        alpha,
        dir,
        magnitude,
    }
}

/// One attractor or respawn site in CSS px.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmitterPoint {
    /// Position in CSS px.
    pub pos: Point,
    /// Deterministic per-cell seed.
    pub seed: u64,
    /// Alpha and gradient at `pos`.
    pub probe: Probe,
}

/// Edge-band and interior samples of one mask.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmitterSet {
    /// Samples on the glyph contour.
    pub edge: Vec<EmitterPoint>,
    /// Sparse samples inside glyphs.
    pub interior: Vec<EmitterPoint>,
}

impl EmitterSet {
    /// `true` when neither set has any point.
    pub fn is_empty(&self) -> bool {
        self.edge.is_empty() && self.interior.is_empty()
    }
}

/// Scan the mask on a `step`-px grid and classify samples.
///
/// Classification is a pure function of the mask and the grid cell, so rebuilding from an
/// identical mask yields identical sets.
#[tracing::instrument(skip(mask), fields(w = mask.width(), h = mask.height()))]
pub fn sample_emitters(mask: &GlyphMask, step: f64) -> EmitterSet {
    let mut out = EmitterSet::default();
    let step = if step.is_finite() && step > 0.0 {
        step
    } else {
        3.0
    };
    let css = mask.css_size();
    let cols = (css.width / step).floor() as i64;
    let rows = (css.height / step).floor() as i64;

    for iy in 0..rows {
        for ix in 0..cols {
            let pos = Point::new((ix as f64 + 0.5) * step, (iy as f64 + 0.5) * step);
            let pr = probe(mask, pos);
            let is_edge = pr.alpha > EDGE_ALPHA.0
                && pr.alpha < EDGE_ALPHA.1
                && pr.magnitude > EDGE_MIN_GRADIENT;
            let is_interior = !is_edge
                && pr.alpha >= INTERIOR_ALPHA
                && hash01(cell_hash(ix, iy, SALT_INTERIOR)) < INTERIOR_KEEP;
            if !is_edge && !is_interior {
                continue;
            }
            let point = EmitterPoint {
                pos,
                seed: cell_hash(ix, iy, SALT_SEED),
                probe: pr,
            };
            if is_edge {
                out.edge.push(point);
            } else {
                out.interior.push(point);
            }
        }
    }

    tracing::debug!(
        edge = out.edge.len(),
        interior = out.interior.len(),
        "emitters sampled"
    );
    out
}

/// A coalesced tile-pitch grid cell that lies inside the glyphs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridCell {
    /// Column index.
    pub ix: i64,
    /// Row index.
    pub iy: i64,
    /// Cell center in CSS px.
    pub pos: Point,
    /// Mask alpha at the center.
    pub alpha: f64,
}

/// Coalesce the mask into a `pitch`-px grid, keeping cells whose center is inside a glyph.
pub fn tile_grid(mask: &GlyphMask, pitch: f64) -> Vec<GridCell> {
    let pitch = if pitch.is_finite() && pitch >= 1.0 {
        pitch
    } else {
        3.0
    };
    let css = mask.css_size();
    let cols = (css.width / pitch).floor() as i64;
    let rows = (css.height / pitch).floor() as i64;
    let mut out = Vec::new();
    for iy in 0..rows {
        for ix in 0..cols {
            let pos = Point::new((ix as f64 + 0.5) * pitch, (iy as f64 + 0.5) * pitch);
            let alpha = mask.alpha_at(pos);
            if alpha >= 0.5 {
                out.push(GridCell { ix, iy, pos, alpha });
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/mask/sampler.rs"]
mod tests;
