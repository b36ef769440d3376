//! Glyph metrics builder
//!
//! Turns raw outline metrics into rounded pixel sizes, raster scales and
//! padded atlas footprints.

use crate::config::{CharacterSet, FontImportConfig};
use crate::geometry::{IVec2, Vec2};
use crate::source::{FontHandle, SourceGlyph};

/// Sized glyph ready for packing
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphDescriptor {
    pub character: char,
    pub has_outline: bool,
    /// Outline bounding box size before rounding
    pub natural_size: Vec2,
    /// Outline left/top edges before rounding
    pub natural_bearing: Vec2,
    /// `natural_size` rounded half up
    pub pixel_size: IVec2,
    /// `pixel_size / natural_size`, identity without an outline
    pub scale: Vec2,
    /// Cell reserved in the atlas, zero without an outline
    pub footprint: IVec2,
    /// `natural_bearing` rounded half up
    pub bearing: IVec2,
    pub advance: f32,
    /// Size reported in the glyph table
    pub display_size: Vec2,
}

impl GlyphDescriptor {
    /// Describe an outlined glyph
    pub fn outlined(character: char, glyph: &SourceGlyph, border: u32) -> Self {
        let pixel_size = glyph.size.round_half_up();
        let margin = i32::try_from(border.saturating_mul(2)).unwrap_or(i32::MAX);

        Self {
            character,
            has_outline: true,
            natural_size: glyph.size,
            natural_bearing: glyph.bearing,
            pixel_size,
            scale: Vec2::new(
                axis_scale(pixel_size.x, glyph.size.x),
                axis_scale(pixel_size.y, glyph.size.y),
            ),
            footprint: IVec2::new(
                pixel_size.x.saturating_add(margin),
                pixel_size.y.saturating_add(margin),
            ),
            bearing: glyph.bearing.round_half_up(),
            advance: glyph.advance,
            display_size: pixel_size.to_vec2(),
        }
    }

    /// Describe a glyph that only advances the pen
    pub fn blank(character: char, advance: f32, line_height: f32) -> Self {
        Self {
            character,
            has_outline: false,
            natural_size: Vec2::ZERO,
            natural_bearing: Vec2::ZERO,
            pixel_size: IVec2::ZERO,
            scale: Vec2::ONE,
            footprint: IVec2::ZERO,
            bearing: IVec2::ZERO,
            advance,
            display_size: Vec2::new(advance, line_height),
        }
    }

    /// Footprint as unsigned packer dimensions
    pub fn footprint_size(&self) -> (u32, u32) {
        (self.footprint.x.max(0) as u32, self.footprint.y.max(0) as u32)
    }
}

fn axis_scale(pixels: i32, natural: f32) -> f32 {
    if natural > 0.0 {
        pixels as f32 / natural
    } else {
        1.0
    }
}

/// One descriptor per mapped character, in character set order
pub fn build_descriptors<F: FontHandle>(
    config: &FontImportConfig,
    characters: &CharacterSet,
    font: &F,
) -> Vec<GlyphDescriptor> {
    let border = config.cell_border();

    characters
        .iter()
        .filter_map(|c| {
            let glyph = font.glyph(c)?;
            let descriptor = if glyph.has_outline() {
                GlyphDescriptor::outlined(c, glyph, border)
            } else {
                GlyphDescriptor::blank(c, glyph.advance, font.line_height())
            };
            tracing::debug!(
                "Glyph {:?}: pixel size {}x{}, footprint {}x{}",
                c,
                descriptor.pixel_size.x,
                descriptor.pixel_size.y,
                descriptor.footprint.x,
                descriptor.footprint.y
            );
            Some(descriptor)
        })
        .collect()
}
