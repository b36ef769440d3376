//! Outline source capability
//!
//! The importer never parses font files itself; it asks an
//! [`OutlineSource`] for a loaded font and reads glyph data through
//! [`FontHandle`].

use crate::config::CharacterSet;
use crate::geometry::Vec2;
use crate::outline::GlyphOutline;
use crate::Result;

/// Glyph data exposed by a loaded font, in pixels at the import resolution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceGlyph {
    /// Outline, `None` for glyphs without contours (space, controls)
    pub outline: Option<GlyphOutline>,
    /// Size of the outline bounding box
    pub size: Vec2,
    /// Left edge and top edge of the outline relative to the origin
    pub bearing: Vec2,
    /// Horizontal advance
    pub advance: f32,
}

impl SourceGlyph {
    /// Glyph with contours
    pub fn outlined(outline: GlyphOutline, size: Vec2, bearing: Vec2, advance: f32) -> Self {
        Self {
            outline: Some(outline),
            size,
            bearing,
            advance,
        }
    }

    /// Glyph that only advances the pen
    pub fn blank(advance: f32) -> Self {
        Self {
            advance,
            ..Default::default()
        }
    }

    pub fn has_outline(&self) -> bool {
        self.outline.is_some()
    }
}

/// Kerning adjustment for an ordered character pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KerningPair {
    pub left: char,
    pub right: char,
    pub adjustment: f32,
}

/// A loaded font
pub trait FontHandle {
    /// Glyph for a character, `None` when the font has no mapping
    fn glyph(&self, c: char) -> Option<&SourceGlyph>;

    /// Baseline to baseline distance
    fn line_height(&self) -> f32;

    /// Distance from the baseline to the top of the em box
    fn ascent(&self) -> f32;

    /// Kerning pairs, `None` when the font carries no kerning data
    fn kerning_pairs(&self) -> Option<&[KerningPair]>;
}

/// Loads fonts from raw bytes
pub trait OutlineSource {
    type Font: FontHandle;

    /// Parse `data` and expose the glyphs of `characters` at `resolution`
    fn load(
        &self,
        data: &[u8],
        resolution: u32,
        characters: &CharacterSet,
        face_index: u32,
    ) -> Result<Self::Font>;
}
