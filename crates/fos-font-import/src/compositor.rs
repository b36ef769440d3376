//! Atlas compositor
//!
//! Drives the packer until every outlined glyph has a cell, then renders
//! each glyph into its cell of a single A8 atlas.

use crate::atlas::AtlasImage;
use crate::config::{FontImportConfig, RepackMode};
use crate::geometry::{Rect, Vec2};
use crate::metrics::GlyphDescriptor;
use crate::packer::RectPacker;
use crate::raster::Rasterizer;
use crate::source::FontHandle;
use crate::{ImportError, Result};

/// Cell assigned to one outlined glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedPlacement {
    /// Index into the descriptor list
    pub index: usize,
    pub character: char,
    /// Full footprint in canvas pixels
    pub rect: Rect,
}

/// Result of a completed packing run
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasLayout {
    pub width: u32,
    pub height: u32,
    /// Placements in character set order
    pub placements: Vec<PackedPlacement>,
    /// Number of canvas growths needed
    pub grow_count: u32,
}

impl AtlasLayout {
    /// Placement for a descriptor index
    pub fn placement(&self, index: usize) -> Option<&PackedPlacement> {
        self.placements.iter().find(|p| p.index == index)
    }
}

/// Pack the footprint of every outlined descriptor.
///
/// Starts from the configured minimum canvas and grows the shorter axis
/// whenever a glyph does not fit. In [`RepackMode::Restart`] the whole pass
/// starts over on the grown canvas; in [`RepackMode::Incremental`] only the
/// failed glyph is retried.
pub fn pack_glyphs(config: &FontImportConfig, descriptors: &[GlyphDescriptor]) -> Result<AtlasLayout> {
    let min_size = config.min_canvas_size()?;
    let mut packer = RectPacker::new(min_size, min_size);

    let packable: Vec<usize> = descriptors
        .iter()
        .enumerate()
        .filter(|(_, d)| d.has_outline)
        .map(|(i, _)| i)
        .collect();

    let mut placements: Vec<PackedPlacement> = Vec::with_capacity(packable.len());
    let mut grow_count = 0u32;
    let mut next = 0usize;

    while let Some(&index) = packable.get(next) {
        let descriptor = &descriptors[index];
        let (width, height) = descriptor.footprint_size();

        if let Some(rect) = packer.insert(width, height) {
            placements.push(PackedPlacement {
                index,
                character: descriptor.character,
                rect,
            });
            next += 1;
            continue;
        }

        tracing::debug!(
            "Glyph {:?} ({}x{}) does not fit in {}x{}",
            descriptor.character,
            width,
            height,
            packer.width(),
            packer.height()
        );

        if grow_count >= config.max_grow_attempts || !packer.grow() {
            return Err(ImportError::PackingExhausted {
                attempts: grow_count,
                width: packer.width(),
                height: packer.height(),
            });
        }
        grow_count += 1;

        if config.repack == RepackMode::Restart {
            packer.clear();
            placements.clear();
            next = 0;
        }
    }

    tracing::info!(
        "Packed {} glyphs into {}x{} after {} resizes ({:.0}% used)",
        placements.len(),
        packer.width(),
        packer.height(),
        grow_count,
        packer.occupancy() * 100.0
    );

    Ok(AtlasLayout {
        width: packer.width(),
        height: packer.height(),
        placements,
        grow_count,
    })
}

/// Cell area handed to the rasterizer: the footprint minus the padding ring
pub fn glyph_destination(config: &FontImportConfig, placement: &PackedPlacement) -> Rect {
    placement.rect.inset(config.padding)
}

/// Translation placing the glyph origin inside its cell
pub fn glyph_offset(config: &FontImportConfig, descriptor: &GlyphDescriptor) -> Vec2 {
    let range = config.sdf_range as f32;
    Vec2::new(
        -descriptor.natural_bearing.x + range,
        (descriptor.natural_size.y - descriptor.natural_bearing.y) + range,
    )
}

/// Render every placed glyph into a fresh atlas of the layout size
pub fn compose_atlas<F, R>(
    config: &FontImportConfig,
    descriptors: &[GlyphDescriptor],
    font: &F,
    layout: &AtlasLayout,
    rasterizer: &R,
) -> Result<AtlasImage>
where
    F: FontHandle + ?Sized,
    R: Rasterizer + ?Sized,
{
    let mut image = AtlasImage::new(layout.width, layout.height);
    let range = config.sdf_range as f32;

    for placement in &layout.placements {
        let descriptor = &descriptors[placement.index];
        let Some(outline) = font
            .glyph(descriptor.character)
            .and_then(|g| g.outline.as_ref())
        else {
            return Err(ImportError::Rasterization {
                character: descriptor.character,
                reason: "outline missing from font source".into(),
            });
        };

        let dest = glyph_destination(config, placement);
        if dest.is_empty() {
            continue;
        }

        rasterizer
            .render(
                outline,
                &mut image,
                dest,
                range,
                descriptor.scale,
                glyph_offset(config, descriptor),
            )
            .map_err(|e| ImportError::Rasterization {
                character: descriptor.character,
                reason: e.to_string(),
            })?;
    }

    tracing::debug!("Rendered {} glyph cells", layout.placements.len());
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::IVec2;

    fn boxed(character: char, w: i32, h: i32) -> GlyphDescriptor {
        GlyphDescriptor {
            character,
            has_outline: true,
            natural_size: Vec2::new(w as f32, h as f32),
            natural_bearing: Vec2::new(1.0, h as f32),
            pixel_size: IVec2::new(w, h),
            scale: Vec2::ONE,
            footprint: IVec2::new(w, h),
            bearing: IVec2::new(1, h),
            advance: w as f32,
            display_size: Vec2::new(w as f32, h as f32),
        }
    }

    fn config(resolution: u32) -> FontImportConfig {
        FontImportConfig::default()
            .with_resolution(resolution)
            .with_sdf_range(0)
            .with_padding(0)
    }

    #[test]
    fn test_blank_glyphs_not_packed() {
        let descriptors = vec![boxed('A', 10, 10), GlyphDescriptor::blank(' ', 5.0, 12.0)];
        let layout = pack_glyphs(&config(16), &descriptors).unwrap();
        assert_eq!(layout.placements.len(), 1);
        assert_eq!(layout.placements[0].character, 'A');
        assert!(layout.placement(1).is_none());
    }

    #[test]
    fn test_restart_grows_and_places_all() {
        let descriptors: Vec<_> = "ABCDE".chars().map(|c| boxed(c, 16, 16)).collect();
        let layout = pack_glyphs(&config(16), &descriptors).unwrap();
        assert_eq!((layout.width, layout.height), (64, 32));
        assert_eq!(layout.grow_count, 3);
        assert_eq!(layout.placements.len(), 5);
        let order: Vec<char> = layout.placements.iter().map(|p| p.character).collect();
        assert_eq!(order, vec!['A', 'B', 'C', 'D', 'E']);
    }

    #[test]
    fn test_incremental_places_all() {
        let descriptors: Vec<_> = "ABCDE".chars().map(|c| boxed(c, 16, 16)).collect();
        let layout = pack_glyphs(
            &config(16).with_repack(RepackMode::Incremental),
            &descriptors,
        )
        .unwrap();
        assert_eq!(layout.placements.len(), 5);
        for (i, a) in layout.placements.iter().enumerate() {
            for b in &layout.placements[i + 1..] {
                assert!(!a.rect.intersects(&b.rect));
            }
        }
    }

    #[test]
    fn test_restart_discards_earlier_placements() {
        // A leaves a strip too short for B; growing then decides where B goes
        let descriptors = vec![boxed('A', 16, 8), boxed('B', 16, 16)];
        let layout = pack_glyphs(&config(16), &descriptors).unwrap();

        assert_eq!(layout.grow_count, 2);
        assert_eq!((layout.width, layout.height), (32, 32));
        assert_eq!(layout.placements[0].rect, Rect::new(0, 0, 16, 8));
        assert_eq!(layout.placements[1].rect, Rect::new(0, 8, 16, 16));
    }

    #[test]
    fn test_incremental_keeps_earlier_placements() {
        let descriptors = vec![boxed('A', 16, 8), boxed('B', 16, 16)];
        let layout = pack_glyphs(
            &config(16).with_repack(RepackMode::Incremental),
            &descriptors,
        )
        .unwrap();

        assert_eq!(layout.grow_count, 1);
        assert_eq!((layout.width, layout.height), (32, 16));
        assert_eq!(layout.placements[0].rect, Rect::new(0, 0, 16, 8));
        assert_eq!(layout.placements[1].rect, Rect::new(16, 0, 16, 16));
    }

    #[test]
    fn test_oversized_config_is_config_error() {
        let descriptors = vec![boxed('A', 10, 10)];
        let err = pack_glyphs(&config(3_000_000_000), &descriptors).unwrap_err();
        assert!(matches!(err, ImportError::Config(_)));
    }

    #[test]
    fn test_missing_outline_aborts() {
        struct EmptyFont;

        impl FontHandle for EmptyFont {
            fn glyph(&self, _c: char) -> Option<&crate::source::SourceGlyph> {
                None
            }
            fn line_height(&self) -> f32 {
                12.0
            }
            fn ascent(&self) -> f32 {
                10.0
            }
            fn kerning_pairs(&self) -> Option<&[crate::source::KerningPair]> {
                None
            }
        }

        let config = config(16);
        let descriptors = vec![boxed('A', 10, 10)];
        let layout = pack_glyphs(&config, &descriptors).unwrap();
        let err = compose_atlas(
            &config,
            &descriptors,
            &EmptyFont,
            &layout,
            &crate::raster::SdfRasterizer::new(),
        )
        .unwrap_err();

        assert!(matches!(err, ImportError::Rasterization { character: 'A', .. }));
    }

    #[test]
    fn test_exhaustion() {
        let descriptors = vec![boxed('W', 500, 500)];
        let err = pack_glyphs(&config(16).with_max_grow_attempts(2), &descriptors).unwrap_err();
        assert!(matches!(
            err,
            ImportError::PackingExhausted { attempts: 2, width: 32, height: 32 }
        ));
    }

    #[test]
    fn test_offset_and_destination() {
        let config = FontImportConfig::default().with_sdf_range(4).with_padding(2);
        let mut d = boxed('g', 10, 14);
        d.natural_bearing = Vec2::new(1.5, 9.0);
        assert_eq!(glyph_offset(&config, &d), Vec2::new(2.5, 9.0));

        let placement = PackedPlacement {
            index: 0,
            character: 'g',
            rect: Rect::new(10, 20, 22, 26),
        };
        assert_eq!(glyph_destination(&config, &placement), Rect::new(12, 22, 18, 22));
    }
}
