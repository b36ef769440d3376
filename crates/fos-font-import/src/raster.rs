//! Signed distance field rasterization

use crate::atlas::AtlasImage;
use crate::geometry::{Rect, Vec2};
use crate::outline::{GlyphOutline, OutlineCommand, Segment};

/// Rasterizer failure, reported verbatim by the importer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct RasterError(pub String);

/// Renders one glyph outline into an atlas sub-rectangle
pub trait Rasterizer {
    /// Render `outline` into `dest` of `target`.
    ///
    /// Outline point `p` lands on cell pixel `(p + offset) * scale`, with
    /// cell y measured upward from the bottom edge of `dest`. Pixels outside
    /// `dest` must not be touched.
    fn render(
        &self,
        outline: &GlyphOutline,
        target: &mut AtlasImage,
        dest: Rect,
        range: f32,
        scale: Vec2,
        offset: Vec2,
    ) -> Result<(), RasterError>;
}

/// Single channel SDF rasterizer
///
/// Inside/outside comes from a non-antialiased tiny-skia fill with the
/// nonzero rule; distance is the exact distance to the flattened outline in
/// cell pixels. Pixel values are `0.5 + d / (2 * range)` mapped to 0..=255,
/// so the outline sits at 128 and the value reaches 0 `range` pixels
/// outside it.
#[derive(Debug, Clone, Copy)]
pub struct SdfRasterizer {
    /// Maximum flattened curve piece length in outline units
    pub tolerance: f32,
}

impl SdfRasterizer {
    pub fn new() -> Self {
        Self { tolerance: 0.25 }
    }
}

impl Default for SdfRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for SdfRasterizer {
    fn render(
        &self,
        outline: &GlyphOutline,
        target: &mut AtlasImage,
        dest: Rect,
        range: f32,
        scale: Vec2,
        offset: Vec2,
    ) -> Result<(), RasterError> {
        if dest.is_empty() {
            return Ok(());
        }
        if !target.bounds().contains(&dest) {
            return Err(RasterError(format!(
                "destination {dest:?} outside {}x{} atlas",
                target.width, target.height
            )));
        }

        let cell = CellTransform {
            scale,
            offset,
            height: dest.height as f32,
        };
        let segments: Vec<Segment> = outline
            .flatten(self.tolerance)
            .into_iter()
            .map(|s| Segment {
                from: cell.apply(s.from),
                to: cell.apply(s.to),
            })
            .collect();

        let inside = inside_mask(outline, &cell, dest.width, dest.height)?;

        let mut bitmap = vec![0u8; dest.area() as usize];
        for row in 0..dest.height {
            for col in 0..dest.width {
                let idx = (row * dest.width + col) as usize;
                let center = Vec2::new(col as f32 + 0.5, row as f32 + 0.5);
                let distance = min_distance(&segments, center);
                let signed = if inside[idx] { distance } else { -distance };
                bitmap[idx] = encode_distance(signed, range);
            }
        }

        target
            .blit(dest, &bitmap)
            .map_err(|e| RasterError(e.to_string()))
    }
}

/// Maps outline units into cell pixels (y down)
struct CellTransform {
    scale: Vec2,
    offset: Vec2,
    height: f32,
}

impl CellTransform {
    fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            (p.x + self.offset.x) * self.scale.x,
            self.height - (p.y + self.offset.y) * self.scale.y,
        )
    }

    fn to_skia(&self) -> tiny_skia::Transform {
        tiny_skia::Transform::from_row(
            self.scale.x,
            0.0,
            0.0,
            -self.scale.y,
            self.offset.x * self.scale.x,
            self.height - self.offset.y * self.scale.y,
        )
    }
}

/// Pixel centers covered by the outline (nonzero winding)
fn inside_mask(
    outline: &GlyphOutline,
    cell: &CellTransform,
    width: u32,
    height: u32,
) -> Result<Vec<bool>, RasterError> {
    let count = (width * height) as usize;
    let Some(path) = build_path(outline) else {
        return Ok(vec![false; count]);
    };

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| RasterError(format!("cannot allocate {width}x{height} mask")))?;

    let mut paint = tiny_skia::Paint::default();
    paint.set_color(tiny_skia::Color::WHITE);
    paint.anti_alias = false;

    pixmap.fill_path(
        &path,
        &paint,
        tiny_skia::FillRule::Winding,
        cell.to_skia(),
        None,
    );

    Ok(pixmap.pixels().iter().map(|p| p.alpha() > 127).collect())
}

/// Convert outline commands to a tiny-skia path
fn build_path(outline: &GlyphOutline) -> Option<tiny_skia::Path> {
    let mut builder = tiny_skia::PathBuilder::new();
    for cmd in &outline.commands {
        match *cmd {
            OutlineCommand::MoveTo(x, y) => builder.move_to(x, y),
            OutlineCommand::LineTo(x, y) => builder.line_to(x, y),
            OutlineCommand::QuadTo(x1, y1, x, y) => builder.quad_to(x1, y1, x, y),
            OutlineCommand::CurveTo(x1, y1, x2, y2, x, y) => {
                builder.cubic_to(x1, y1, x2, y2, x, y)
            }
            OutlineCommand::Close => builder.close(),
        }
    }
    builder.finish()
}

fn min_distance(segments: &[Segment], p: Vec2) -> f32 {
    segments
        .iter()
        .map(|s| segment_distance(s, p))
        .fold(f32::MAX, f32::min)
}

fn segment_distance(s: &Segment, p: Vec2) -> f32 {
    let dx = s.to.x - s.from.x;
    let dy = s.to.y - s.from.y;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((p.x - s.from.x) * dx + (p.y - s.from.y) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let cx = s.from.x + t * dx;
    let cy = s.from.y + t * dy;
    (p.x - cx).hypot(p.y - cy)
}

/// Map a signed pixel distance (positive inside) to a byte
fn encode_distance(signed: f32, range: f32) -> u8 {
    let value = if range > 0.0 {
        0.5 + signed / (2.0 * range)
    } else if signed > 0.0 {
        1.0
    } else {
        0.0
    };
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
