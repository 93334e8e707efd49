use std::borrow::Cow;

use vello_cpu::kurbo::Affine;

use crate::foundation::error::{RevealError, RevealResult};
use crate::mask::metrics::{FontSpec, GlyphPainter, LineLayout, TextMetrics};

/// Face backed by real font bytes: shaped with Parley, painted with `vello_cpu` glyph runs.
///
/// Advances come from the cluster advances of the shaped line, so kerning and letter spacing
/// land in the same place the painter later draws them.
pub struct ParleyFace {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    font_data: vello_cpu::peniko::FontData,
    spec: FontSpec,
}

impl std::fmt::Debug for ParleyFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyFace")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

impl ParleyFace {
    /// Register `font_bytes` and report metrics from `spec`, with the family replaced by the
    /// name found in the font data.
    pub fn new(font_bytes: Vec<u8>, spec: FontSpec) -> RevealResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| RevealError::font("no font families registered from font bytes"))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| RevealError::font("registered font family has no name"))?
            .to_string();

        let font_data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);

        tracing::debug!(%family, "registered headline font");
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            font_data,
            spec: FontSpec { family, ..spec }.sanitized(),
        })
    }

    fn layout(&mut self, text: &str, font: &FontSpec) -> parley::Layout<()> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(font.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size_px as f32));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(font.weight)),
        ));
        builder.push_default(parley::style::StyleProperty::LetterSpacing(
            font.letter_spacing_px as f32,
        ));
        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

impl TextMetrics for ParleyFace {
    fn font(&self) -> Option<FontSpec> {
        Some(self.spec.clone())
    }

    fn char_advances(&mut self, line: &str, font: &FontSpec) -> Option<Vec<f64>> {
        let starts: Vec<usize> = line.char_indices().map(|(i, _)| i).collect();
        let mut out = vec![0.0f64; starts.len()];
        let layout = self.layout(line, font);
        for l in layout.lines() {
            for run in l.runs() {
                for cluster in run.visual_clusters() {
                    let adv = f64::from(cluster.advance());
                    if !adv.is_finite() {
                        return None;
                    }
                    // a multi-char cluster books its whole advance on its first char
                    if let Ok(ci) = starts.binary_search(&cluster.text_range().start) {
                        out[ci] += adv.max(0.0);
                    }
                }
            }
        }
        Some(out)
    }
}

impl GlyphPainter for ParleyFace {
    fn paint_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        line: &LineLayout,
        font: &FontSpec,
        base: Affine,
    ) {
        if line.text.trim().is_empty() {
            return;
        }
        let layout = self.layout(&line.text, font);
        let Some(first) = layout.lines().next() else {
            return;
        };
        let ascent = f64::from(first.metrics().baseline);
        ctx.set_transform(
            base * Affine::translate((line.origin_x, line.baseline_y - ascent)),
        );
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
        for l in layout.lines() {
            for item in l.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font_data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mask/parley_face.rs"]
mod tests;
