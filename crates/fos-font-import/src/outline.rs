//! Glyph outline storage
//!
//! Outlines are kept in pixel units at the import resolution with the
//! y axis pointing up from the baseline.

use crate::geometry::Vec2;

/// Outline command
#[derive(Debug, Clone, PartialEq)]
pub enum OutlineCommand {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    QuadTo(f32, f32, f32, f32),
    CurveTo(f32, f32, f32, f32, f32, f32),
    Close,
}

/// A complete glyph outline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphOutline {
    pub commands: Vec<OutlineCommand>,
}

/// Straight edge produced by flattening
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
}

impl GlyphOutline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(OutlineCommand::MoveTo(x, y));
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(OutlineCommand::LineTo(x, y));
    }

    pub fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.commands.push(OutlineCommand::QuadTo(x1, y1, x, y));
    }

    pub fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.commands.push(OutlineCommand::CurveTo(x1, y1, x2, y2, x, y));
    }

    pub fn close(&mut self) {
        self.commands.push(OutlineCommand::Close);
    }

    /// Approximate every contour with straight segments.
    ///
    /// Curves are split so no piece is longer than `tolerance` along the
    /// control polygon. Open contours are closed implicitly.
    pub fn flatten(&self, tolerance: f32) -> Vec<Segment> {
        let tolerance = tolerance.max(0.01);
        let mut segments = Vec::new();
        let mut start = Vec2::ZERO;
        let mut current = Vec2::ZERO;
        let mut open = false;

        for cmd in &self.commands {
            match *cmd {
                OutlineCommand::MoveTo(x, y) => {
                    if open {
                        push(&mut segments, current, start);
                    }
                    start = Vec2::new(x, y);
                    current = start;
                    open = true;
                }
                OutlineCommand::LineTo(x, y) => {
                    let to = Vec2::new(x, y);
                    push(&mut segments, current, to);
                    current = to;
                }
                OutlineCommand::QuadTo(x1, y1, x, y) => {
                    let c = Vec2::new(x1, y1);
                    let to = Vec2::new(x, y);
                    let steps = subdivisions(distance(current, c) + distance(c, to), tolerance);
                    let mut prev = current;
                    for i in 1..=steps {
                        let t = i as f32 / steps as f32;
                        let p = quad_point(current, c, to, t);
                        push(&mut segments, prev, p);
                        prev = p;
                    }
                    current = to;
                }
                OutlineCommand::CurveTo(x1, y1, x2, y2, x, y) => {
                    let c1 = Vec2::new(x1, y1);
                    let c2 = Vec2::new(x2, y2);
                    let to = Vec2::new(x, y);
                    let length = distance(current, c1) + distance(c1, c2) + distance(c2, to);
                    let steps = subdivisions(length, tolerance);
                    let mut prev = current;
                    for i in 1..=steps {
                        let t = i as f32 / steps as f32;
                        let p = cubic_point(current, c1, c2, to, t);
                        push(&mut segments, prev, p);
                        prev = p;
                    }
                    current = to;
                }
                OutlineCommand::Close => {
                    push(&mut segments, current, start);
                    current = start;
                    open = false;
                }
            }
        }

        if open {
            push(&mut segments, current, start);
        }

        segments
    }
}

/// Collects a ttf-parser outline scaled from font units to pixels
pub(crate) struct ScaledOutlineBuilder {
    outline: GlyphOutline,
    scale: f32,
}

impl ScaledOutlineBuilder {
    pub(crate) fn new(scale: f32) -> Self {
        Self {
            outline: GlyphOutline::new(),
            scale,
        }
    }

    pub(crate) fn finish(self) -> GlyphOutline {
        self.outline
    }
}

impl ttf_parser::OutlineBuilder for ScaledOutlineBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let s = self.scale;
        self.outline.move_to(x * s, y * s);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let s = self.scale;
        self.outline.line_to(x * s, y * s);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let s = self.scale;
        self.outline.quad_to(x1 * s, y1 * s, x * s, y * s);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let s = self.scale;
        self.outline
            .curve_to(x1 * s, y1 * s, x2 * s, y2 * s, x * s, y * s);
    }

    fn close(&mut self) {
        self.outline.close();
    }
}

fn push(segments: &mut Vec<Segment>, from: Vec2, to: Vec2) {
    if from != to {
        segments.push(Segment { from, to });
    }
}

fn subdivisions(length: f32, tolerance: f32) -> u32 {
    ((length / tolerance).ceil() as u32).clamp(1, 64)
}

fn distance(a: Vec2, b: Vec2) -> f32 {
    (b.x - a.x).hypot(b.y - a.y)
}

fn quad_point(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let mt = 1.0 - t;
    Vec2::new(
        mt * mt * p0.x + 2.0 * mt * t * p1.x + t * t * p2.x,
        mt * mt * p0.y + 2.0 * mt * t * p1.y + t * t * p2.y,
    )
}

fn cubic_point(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    Vec2::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}
