//! Font resource assembler

use std::collections::BTreeMap;

use crate::atlas::AtlasImage;
use crate::compositor::{AtlasLayout, glyph_destination};
use crate::config::FontImportConfig;
use crate::geometry::Vec2;
use crate::metrics::GlyphDescriptor;
use crate::source::FontHandle;

/// Kerning adjustments keyed by (left, right)
pub type KerningMap = BTreeMap<(char, char), f32>;

/// Runtime metrics for one glyph
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRecord {
    pub character: char,
    pub advance: f32,
    pub bearing: Vec2,
    pub size: Vec2,
    /// Top-left corner in normalized atlas space, zero for blank glyphs
    pub uv_min: Vec2,
    /// Bottom-right corner in normalized atlas space, zero for blank glyphs
    pub uv_max: Vec2,
}

impl GlyphRecord {
    /// True when the glyph samples a region of the atlas
    pub fn has_texture(&self) -> bool {
        self.uv_max.x > self.uv_min.x && self.uv_max.y > self.uv_min.y
    }
}

/// Imported font ready for serialization
#[derive(Debug, Clone, PartialEq)]
pub struct FontResource {
    /// Pixel size the glyphs were imported at
    pub em_resolution: u32,
    pub line_height: f32,
    pub ascent: f32,
    pub atlas: AtlasImage,
    /// Records in character set order
    pub glyphs: Vec<GlyphRecord>,
    pub kerning: Option<KerningMap>,
}

impl FontResource {
    /// Record for a character
    pub fn glyph(&self, c: char) -> Option<&GlyphRecord> {
        self.glyphs.iter().find(|g| g.character == c)
    }

    /// Kerning adjustment for a pair, 0 when absent
    pub fn kerning(&self, left: char, right: char) -> f32 {
        self.kerning
            .as_ref()
            .and_then(|k| k.get(&(left, right)).copied())
            .unwrap_or(0.0)
    }
}

/// Build the glyph table and kerning map around a rendered atlas
pub fn assemble<F>(
    config: &FontImportConfig,
    descriptors: &[GlyphDescriptor],
    layout: &AtlasLayout,
    atlas: AtlasImage,
    font: &F,
) -> FontResource
where
    F: FontHandle + ?Sized,
{
    let glyphs = descriptors
        .iter()
        .enumerate()
        .map(|(index, d)| {
            let (uv_min, uv_max) = match layout.placement(index) {
                Some(placement) => {
                    glyph_destination(config, placement).uv(layout.width, layout.height)
                }
                None => (Vec2::ZERO, Vec2::ZERO),
            };
            GlyphRecord {
                character: d.character,
                advance: d.advance,
                bearing: d.bearing.to_vec2(),
                size: d.display_size,
                uv_min,
                uv_max,
            }
        })
        .collect::<Vec<_>>();

    let kerning = font.kerning_pairs().map(|pairs| {
        pairs
            .iter()
            .map(|p| ((p.left, p.right), p.adjustment))
            .collect::<KerningMap>()
    });

    tracing::info!(
        "Assembled {} glyph records, {} kerning pairs",
        glyphs.len(),
        kerning.as_ref().map_or(0, |k| k.len())
    );

    FontResource {
        em_resolution: config.resolution,
        line_height: font.line_height(),
        ascent: font.ascent(),
        atlas,
        glyphs,
        kerning,
    }
}
