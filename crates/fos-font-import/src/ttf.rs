//! TrueType outline source backed by ttf-parser

use std::collections::HashMap;

use ttf_parser::{Face, GlyphId};

use crate::config::CharacterSet;
use crate::geometry::Vec2;
use crate::outline::ScaledOutlineBuilder;
use crate::source::{FontHandle, KerningPair, OutlineSource, SourceGlyph};
use crate::{ImportError, Result};

/// Loads TrueType/OpenType fonts with ttf-parser
#[derive(Debug, Clone, Copy, Default)]
pub struct TtfOutlineSource;

/// Glyph data extracted from a parsed face
#[derive(Debug, Clone)]
pub struct TtfFont {
    glyphs: HashMap<char, SourceGlyph>,
    line_height: f32,
    ascent: f32,
    kerning: Option<Vec<KerningPair>>,
}

impl FontHandle for TtfFont {
    fn glyph(&self, c: char) -> Option<&SourceGlyph> {
        self.glyphs.get(&c)
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn ascent(&self) -> f32 {
        self.ascent
    }

    fn kerning_pairs(&self) -> Option<&[KerningPair]> {
        self.kerning.as_deref()
    }
}

impl OutlineSource for TtfOutlineSource {
    type Font = TtfFont;

    fn load(
        &self,
        data: &[u8],
        resolution: u32,
        characters: &CharacterSet,
        face_index: u32,
    ) -> Result<TtfFont> {
        let face = Face::parse(data, face_index)
            .map_err(|e| ImportError::Source(e.to_string()))?;

        let units_per_em = face.units_per_em();
        if units_per_em == 0 {
            return Err(ImportError::Source("units per em is zero".into()));
        }
        let scale = resolution as f32 / units_per_em as f32;

        let mut glyphs = HashMap::with_capacity(characters.len());
        let mut ids = Vec::with_capacity(characters.len());
        for c in characters.iter() {
            let Some(id) = face.glyph_index(c) else {
                tracing::debug!("Font has no glyph for {:?}, skipping", c);
                continue;
            };
            glyphs.insert(c, extract_glyph(&face, id, scale));
            ids.push((c, id));
        }

        let line_height =
            (face.ascender() as f32 - face.descender() as f32 + face.line_gap() as f32) * scale;
        let ascent = face.ascender() as f32 * scale;
        let kerning = extract_kerning(&face, &ids, scale);

        tracing::debug!(
            "Loaded face: {} units/em, {} of {} characters mapped",
            units_per_em,
            glyphs.len(),
            characters.len()
        );

        Ok(TtfFont {
            glyphs,
            line_height,
            ascent,
            kerning,
        })
    }
}

fn extract_glyph(face: &Face<'_>, id: GlyphId, scale: f32) -> SourceGlyph {
    let advance = face.glyph_hor_advance(id).unwrap_or(0) as f32 * scale;

    let mut builder = ScaledOutlineBuilder::new(scale);
    let Some(bbox) = face.outline_glyph(id, &mut builder) else {
        return SourceGlyph::blank(advance);
    };

    let outline = builder.finish();
    if outline.is_empty() {
        return SourceGlyph::blank(advance);
    }

    // Bounding box from the glyph header, in pixels
    let x_min = bbox.x_min as f32 * scale;
    let y_max = bbox.y_max as f32 * scale;
    SourceGlyph::outlined(
        outline,
        Vec2::new(bbox.width() as f32 * scale, bbox.height() as f32 * scale),
        Vec2::new(x_min, y_max),
        advance,
    )
}

/// Pairs from the legacy `kern` table, restricted to the imported characters
fn extract_kerning(face: &Face<'_>, ids: &[(char, GlyphId)], scale: f32) -> Option<Vec<KerningPair>> {
    let kern = face.tables().kern?;
    let subtables: Vec<_> = kern
        .subtables
        .into_iter()
        .filter(|subtable| subtable.horizontal && !subtable.variable)
        .collect();

    let mut pairs = Vec::new();
    for &(left, left_id) in ids {
        for &(right, right_id) in ids {
            let mut value = 0i32;
            for subtable in &subtables {
                if let Some(v) = subtable.glyphs_kerning(left_id, right_id) {
                    value += v as i32;
                }
            }

            if value != 0 {
                pairs.push(KerningPair {
                    left,
                    right,
                    adjustment: value as f32 * scale,
                });
            }
        }
    }

    Some(pairs)
}
