//! fOS Font Import - SDF Font Atlas Builder
//!
//! Converts a TrueType font into a runtime font resource:
//! - Glyph metrics sized to the configured resolution
//! - Power-of-two atlas packing (best long side fit, grow on failure)
//! - Signed distance field rendering of every outlined glyph
//! - Glyph table with normalized UVs and a kerning map
//!
//! Font parsing, distance field rendering and resource persistence sit
//! behind the [`OutlineSource`], [`Rasterizer`] and [`ResourceSerializer`]
//! traits so the layout core can run against synthetic outlines.

pub mod config;
pub mod geometry;
pub mod outline;
pub mod source;
pub mod ttf;
pub mod metrics;
pub mod packer;
pub mod atlas;
pub mod compositor;
pub mod raster;
pub mod assembler;
pub mod writer;
mod importer;

pub use config::{CharacterSet, FontImportConfig, RepackMode};
pub use geometry::{IVec2, Rect, Vec2};
pub use outline::{GlyphOutline, OutlineCommand};
pub use source::{FontHandle, KerningPair, OutlineSource, SourceGlyph};
pub use ttf::{TtfFont, TtfOutlineSource};
pub use metrics::{GlyphDescriptor, build_descriptors};
pub use packer::RectPacker;
pub use atlas::AtlasImage;
pub use compositor::{AtlasLayout, PackedPlacement, compose_atlas, pack_glyphs};
pub use raster::{Rasterizer, SdfRasterizer};
pub use assembler::{FontResource, GlyphRecord, KerningMap, assemble};
pub use writer::{BinaryFontWriter, ResourceSerializer, read_font};
pub use importer::FontImporter;

/// Font import error types
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Invalid import configuration: {0}")]
    Config(String),

    #[error("Failed to parse font: {0}")]
    Source(String),

    #[error("Atlas packing exhausted after {attempts} resizes ({width}x{height})")]
    PackingExhausted { attempts: u32, width: u32, height: u32 },

    #[error("Failed to rasterize glyph {character:?}: {reason}")]
    Rasterization { character: char, reason: String },

    #[error("Invalid font resource: {0}")]
    Format(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, ImportError>;
