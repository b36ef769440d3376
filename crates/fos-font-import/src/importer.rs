//! Import pipeline

use crate::assembler::{FontResource, assemble};
use crate::compositor::{compose_atlas, pack_glyphs};
use crate::config::FontImportConfig;
use crate::metrics::build_descriptors;
use crate::raster::{Rasterizer, SdfRasterizer};
use crate::source::{FontHandle, OutlineSource};
use crate::ttf::TtfOutlineSource;
use crate::writer::ResourceSerializer;
use crate::Result;

/// Font importer
///
/// Runs metrics, packing, rendering and assembly for one font file.
/// Each call allocates its own packer and atlas, so one importer can be
/// reused for any number of files.
pub struct FontImporter<S = TtfOutlineSource, R = SdfRasterizer> {
    config: FontImportConfig,
    source: S,
    rasterizer: R,
}

impl FontImporter {
    /// Importer with the TrueType source and SDF rasterizer
    pub fn new(config: FontImportConfig) -> Self {
        Self::with_collaborators(config, TtfOutlineSource, SdfRasterizer::new())
    }
}

impl<S: OutlineSource, R: Rasterizer> FontImporter<S, R> {
    pub fn with_collaborators(config: FontImportConfig, source: S, rasterizer: R) -> Self {
        Self {
            config,
            source,
            rasterizer,
        }
    }

    pub fn config(&self) -> &FontImportConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Build the font resource without persisting it
    pub fn build(&self, data: &[u8]) -> Result<FontResource> {
        let config = &self.config;
        config.validate()?;
        let characters = config.character_set()?;

        tracing::info!(
            "Importing font: {} characters at {}px (range {}, padding {})",
            characters.len(),
            config.resolution,
            config.sdf_range,
            config.padding
        );

        let font = self
            .source
            .load(data, config.resolution, &characters, config.face_index)?;
        let descriptors = build_descriptors(config, &characters, &font);
        let skipped = characters.len() - descriptors.len();
        if skipped > 0 {
            tracing::warn!("{} characters have no glyph in the font", skipped);
        }

        let layout = pack_glyphs(config, &descriptors)?;
        let atlas = compose_atlas(config, &descriptors, &font, &layout, &self.rasterizer)?;
        let resource = assemble(config, &descriptors, &layout, atlas, &font);

        tracing::info!(
            "Font imported: {} glyphs, {}x{} atlas, line height {:.1}",
            resource.glyphs.len(),
            resource.atlas.width,
            resource.atlas.height,
            font.line_height()
        );

        Ok(resource)
    }

    /// Build the font resource and hand it to `serializer`.
    ///
    /// Nothing reaches the serializer when any stage fails.
    pub fn import<W: ResourceSerializer + ?Sized>(&self, data: &[u8], serializer: &mut W) -> Result<()> {
        let resource = self.build(data)?;
        serializer.write_font(resource)
    }
}
