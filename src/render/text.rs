use std::{borrow::Cow, collections::HashMap};

use crate::{
    foundation::error::{CountdownError, CountdownResult},
    render::fonts::{FontBook, FontFace, FontRole},
};

/// A single shaped line, positioned in surface pixels and ready for `fill_glyphs`.
pub(crate) struct ShapedLine {
    pub(crate) font: vello_cpu::peniko::FontData,
    pub(crate) font_size: f32,
    pub(crate) glyphs: Vec<vello_cpu::Glyph>,
}

struct RegisteredFace {
    family: String,
    weight: f32,
    font: vello_cpu::peniko::FontData,
    face: FontFace,
}

/// Parley contexts plus the faces of a [`FontBook`], registered once.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    faces: Vec<RegisteredFace>,
    roles: HashMap<FontRole, usize>,
    fallbacks: Vec<usize>,
    picks: HashMap<(FontRole, String), Option<usize>>,
}

impl TextLayoutEngine {
    pub(crate) fn new(fonts: &FontBook) -> Self {
        let mut engine = Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: Vec::new(),
            roles: HashMap::new(),
            fallbacks: Vec::new(),
            picks: HashMap::new(),
        };
        for role in [FontRole::Number, FontRole::Label] {
            if let Some(face) = fonts.face(role) {
                let slot = engine.register(face);
                engine.roles.insert(role, slot);
            }
        }
        for face in fonts.fallbacks() {
            let slot = engine.register(face);
            engine.fallbacks.push(slot);
        }
        engine
    }

    fn register(&mut self, face: &FontFace) -> usize {
        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(face.bytes.as_ref().clone()),
            None,
        );
        let family = families
            .first()
            .and_then(|(id, _)| self.font_ctx.collection.family_name(*id))
            .map(str::to_string)
            .unwrap_or_else(|| face.family.clone());
        self.faces.push(RegisteredFace {
            family,
            weight: f32::from(face.weight),
            font: vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(face.bytes.as_ref().clone()),
                face.index,
            ),
            face: face.clone(),
        });
        self.faces.len() - 1
    }

    /// The role's face when it covers `text`, else the first covering fallback, else the
    /// role's face anyway (missing glyphs draw as `.notdef`).
    fn pick(&mut self, role: FontRole, text: &str) -> Option<usize> {
        if let Some(slot) = self.picks.get(&(role, text.to_string())) {
            return *slot;
        }
        let primary = self.roles.get(&role).copied();
        let covering = primary
            .into_iter()
            .chain(self.fallbacks.iter().copied())
            .find(|&slot| self.faces[slot].face.covers(text));
        if covering.is_none() && primary.is_some() {
            tracing::debug!(text, "no registered face covers text");
        }
        let slot = covering.or(primary);
        self.picks.insert((role, text.to_string()), slot);
        slot
    }

    /// Shape `text` so that its advance box is centered on `center_x` and its baseline sits on
    /// `baseline_y`. Returns `None` when no registered face can be used for `role`.
    pub(crate) fn shape_centered(
        &mut self,
        text: &str,
        role: FontRole,
        size_px: f32,
        center_x: f32,
        baseline_y: f32,
    ) -> CountdownResult<Option<ShapedLine>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CountdownError::render(
                "text size_px must be finite and > 0",
            ));
        }
        let Some(slot) = self.pick(role, text) else {
            return Ok(None);
        };
        let face = &self.faces[slot];

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(face.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(face.weight),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let dx = center_x - layout.width() / 2.0;
        let mut glyphs = Vec::with_capacity(text.len());
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let dy = baseline_y - run.baseline();
                glyphs.extend(run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x + dx,
                    y: g.y + dy,
                }));
            }
        }

        Ok(Some(ShapedLine {
            font: face.font.clone(),
            font_size: size_px,
            glyphs,
        }))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
