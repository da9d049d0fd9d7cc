use std::{path::Path, sync::Arc};

use usvg::fontdb;

use crate::{
    catalog::labels::Language,
    foundation::error::{CountdownError, CountdownResult},
};

/// Which text slot a face is used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontRole {
    /// Bold face for the numbers and the "Expired" text.
    Number,
    /// Regular face for the unit labels.
    Label,
}

/// One resolved font face: raw bytes plus the family name read from its name table.
#[derive(Clone, Debug)]
pub struct FontFace {
    /// Family name as reported by the face.
    pub family: String,
    /// Face index within a collection file.
    pub index: u32,
    /// CSS-style weight (400 regular, 700 bold).
    pub weight: u16,
    /// Raw font file bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Where the face came from (file path or `system:<family>`).
    pub source: String,
}

impl FontFace {
    /// Parse `bytes` and take the first face's family name.
    pub fn from_bytes(bytes: Vec<u8>, source: impl Into<String>) -> CountdownResult<Self> {
        let mut db = fontdb::Database::new();
        db.load_font_data(bytes.clone());
        let face = db
            .faces()
            .next()
            .ok_or_else(|| CountdownError::validation("font data contains no usable face"))?;
        let family = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .ok_or_else(|| CountdownError::validation("font face has no family name"))?;
        Ok(Self {
            family,
            index: face.index,
            weight: face.weight.0,
            bytes: Arc::new(bytes),
            source: source.into(),
        })
    }

    /// `true` when this face has a glyph for every non-whitespace character of `text`.
    pub fn covers(&self, text: &str) -> bool {
        ttf_parser::Face::parse(&self.bytes, self.index)
            .is_ok_and(|face| text_has_glyphs(&face, text))
    }

    /// Read and parse a font file.
    pub fn from_file(path: &Path) -> CountdownResult<Self> {
        use anyhow::Context as _;
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        Self::from_bytes(bytes, path.display().to_string())
    }
}

/// Fonts used by the Frame Renderer, resolved once before rendering starts.
///
/// A missing face is not an error: text in that role is skipped (with a warning) so rendering
/// stays total. Tests that must not depend on installed fonts use [`FontBook::empty`].
///
/// `fallbacks` are tried, in order, for text the role's own face has no glyphs for (for
/// example CJK labels when the label face is a Latin sans).
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    number: Option<FontFace>,
    label: Option<FontFace>,
    fallbacks: Vec<FontFace>,
}

const PREFERRED_FAMILIES: &[&str] = &[
    "Arial",
    "Helvetica",
    "Liberation Sans",
    "DejaVu Sans",
    "Noto Sans",
    "Roboto",
];

impl FontBook {
    /// No fonts; every text draw becomes a no-op.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Explicit faces for each role, without fallbacks.
    pub fn new(number: Option<FontFace>, label: Option<FontFace>) -> Self {
        Self {
            number,
            label,
            fallbacks: Vec::new(),
        }
    }

    /// Append coverage fallbacks, tried after the role's own face.
    pub fn with_fallbacks(mut self, faces: impl IntoIterator<Item = FontFace>) -> Self {
        self.fallbacks.extend(faces);
        self
    }

    /// Search the system font database for a sans-serif bold face, a regular face, and
    /// fallbacks for label scripts the regular face cannot draw.
    pub fn system() -> Self {
        Self::from_system(None)
    }

    fn from_system(label_override: Option<FontFace>) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        let number = query_face(&db, fontdb::Weight::BOLD);
        let label = label_override.or_else(|| query_face(&db, fontdb::Weight::NORMAL));
        if number.is_none() && label.is_none() {
            tracing::warn!(
                faces = db.len(),
                "no usable system font found; text will not be drawn"
            );
            return Self::empty();
        }
        let fallbacks = label_fallbacks(&db, label.as_ref().or(number.as_ref()));
        Self {
            number,
            label,
            fallbacks,
        }
    }

    /// Explicit font files where given, the system database for the rest.
    ///
    /// When only a number font is given it is also used for labels, and no system fonts are
    /// consulted.
    pub fn resolve(number: Option<&Path>, label: Option<&Path>) -> CountdownResult<Self> {
        let number = number.map(FontFace::from_file).transpose()?;
        let label = label.map(FontFace::from_file).transpose()?;
        if number.is_some() {
            let label = label.or_else(|| number.clone());
            return Ok(Self::new(number, label));
        }
        Ok(Self::from_system(label))
    }

    /// The face for `role`, falling back to the other role's face.
    pub fn face(&self, role: FontRole) -> Option<&FontFace> {
        match role {
            FontRole::Number => self.number.as_ref().or(self.label.as_ref()),
            FontRole::Label => self.label.as_ref().or(self.number.as_ref()),
        }
    }

    /// Coverage fallbacks, in lookup order.
    pub fn fallbacks(&self) -> &[FontFace] {
        &self.fallbacks
    }

    /// `true` when no face is available for any role.
    pub fn is_empty(&self) -> bool {
        self.number.is_none() && self.label.is_none() && self.fallbacks.is_empty()
    }
}

fn query_face(db: &fontdb::Database, weight: fontdb::Weight) -> Option<FontFace> {
    let mut families: Vec<fontdb::Family<'_>> = PREFERRED_FAMILIES
        .iter()
        .copied()
        .map(fontdb::Family::Name)
        .collect();
    families.push(fontdb::Family::SansSerif);

    let id = db
        .query(&fontdb::Query {
            families: &families,
            weight,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        })
        .or_else(|| db.faces().next().map(|f| f.id))?;
    load_face(db, id)
}

fn load_face(db: &fontdb::Database, id: fontdb::ID) -> Option<FontFace> {
    let info = db.face(id)?;
    let family = info.families.first().map(|(name, _)| name.clone())?;
    let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    tracing::debug!(family = %family, weight = info.weight.0, "resolved system font");
    Some(FontFace {
        source: format!("system:{family}"),
        family,
        index,
        weight: info.weight.0,
        bytes: Arc::new(bytes),
    })
}

/// System faces covering the label sets `primary` cannot draw, one per uncovered set,
/// preferring upright faces closest to regular weight.
fn label_fallbacks(db: &fontdb::Database, primary: Option<&FontFace>) -> Vec<FontFace> {
    let mut missing: Vec<String> = Language::ALL
        .into_iter()
        .map(|l| l.labels().in_order().concat())
        .filter(|text| !primary.is_some_and(|f| f.covers(text)))
        .collect();
    if missing.is_empty() {
        return Vec::new();
    }

    let mut candidates: Vec<(u16, fontdb::ID)> = db
        .faces()
        .filter(|f| f.style == fontdb::Style::Normal)
        .map(|f| (f.weight.0.abs_diff(fontdb::Weight::NORMAL.0), f.id))
        .collect();
    candidates.sort_by_key(|(distance, _)| *distance);

    let mut out = Vec::new();
    for (_, id) in candidates {
        if missing.is_empty() {
            break;
        }
        let covered = db
            .with_face_data(id, |data, index| {
                let face = ttf_parser::Face::parse(data, index).ok()?;
                Some(
                    missing
                        .iter()
                        .map(|text| text_has_glyphs(&face, text))
                        .collect::<Vec<_>>(),
                )
            })
            .flatten();
        let Some(covered) = covered.filter(|c| c.contains(&true)) else {
            continue;
        };
        let Some(face) = load_face(db, id) else {
            continue;
        };
        let mut flags = covered.into_iter();
        missing.retain(|_| !flags.next().unwrap_or(false));
        out.push(face);
    }
    if !missing.is_empty() {
        tracing::warn!(
            uncovered = missing.len(),
            "no installed font covers some label scripts; they will draw as missing glyphs"
        );
    }
    out
}

fn text_has_glyphs(face: &ttf_parser::Face<'_>, text: &str) -> bool {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .all(|c| face.glyph_index(c).is_some())
}

#[cfg(test)]
#[path = "../../tests/unit/render/fonts.rs"]
mod tests;
