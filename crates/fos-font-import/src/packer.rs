//! Rectangle packer
//!
//! Guillotine free-rectangle packing over a power-of-two canvas. Every
//! placement consumes one free rectangle and leaves at most two disjoint
//! strips behind, so free space never overlaps a placed rectangle.

use crate::geometry::Rect;

/// Rectangle packer over a growable canvas
#[derive(Debug, Clone)]
pub struct RectPacker {
    width: u32,
    height: u32,
    /// Free rectangles, in creation order
    free_rects: Vec<Rect>,
    /// Placed rectangles
    used_rects: Vec<Rect>,
}

impl RectPacker {
    /// Create a packer with the whole canvas free
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            free_rects: vec![Rect::new(0, 0, width, height)],
            used_rects: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Canvas size as (width, height)
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// No rectangle has been placed since the last clear
    pub fn is_empty(&self) -> bool {
        self.used_rects.is_empty()
    }

    /// Placed rectangles, in insertion order
    pub fn used_rects(&self) -> &[Rect] {
        &self.used_rects
    }

    /// Free rectangles
    pub fn free_rects(&self) -> &[Rect] {
        &self.free_rects
    }

    /// Place a rectangle using best long side fit.
    ///
    /// Returns `None` without touching any state when nothing fits.
    pub fn insert(&mut self, width: u32, height: u32) -> Option<Rect> {
        let best_idx = self.find_best_rect(width, height)?;
        let free_rect = self.free_rects[best_idx];

        let placed = Rect::new(free_rect.x, free_rect.y, width, height);
        self.split_free_rect(best_idx, width, height);
        self.used_rects.push(placed);

        Some(placed)
    }

    /// Find the free rectangle that minimizes the longer leftover side,
    /// breaking ties on the shorter leftover side
    fn find_best_rect(&self, width: u32, height: u32) -> Option<usize> {
        let mut best_idx = None;
        let mut best_long_side = u32::MAX;
        let mut best_short_side = u32::MAX;

        for (i, rect) in self.free_rects.iter().enumerate() {
            if !rect.can_fit(width, height) {
                continue;
            }

            let leftover_h = rect.width - width;
            let leftover_v = rect.height - height;
            let long_side = leftover_h.max(leftover_v);
            let short_side = leftover_h.min(leftover_v);

            if long_side < best_long_side
                || (long_side == best_long_side && short_side < best_short_side)
            {
                best_idx = Some(i);
                best_long_side = long_side;
                best_short_side = short_side;
            }
        }

        best_idx
    }

    /// Replace a free rectangle with the strips left over by a placement
    fn split_free_rect(&mut self, idx: usize, width: u32, height: u32) {
        let rect = self.free_rects.remove(idx);

        // Right remainder, as tall as the placement
        if rect.width > width && height > 0 {
            self.free_rects.push(Rect::new(
                rect.x + width,
                rect.y,
                rect.width - width,
                height,
            ));
        }

        // Bottom remainder, full width
        if rect.height > height {
            self.free_rects.push(Rect::new(
                rect.x,
                rect.y + height,
                rect.width,
                rect.height - height,
            ));
        }

        self.free_rects.retain(|r| !r.is_empty());
    }

    /// Grow the canvas, keeping every placement.
    ///
    /// Dimensions never shrink; a smaller request keeps the current size on
    /// that axis. New space is added as a right band over the full new
    /// height and a bottom band under the old width.
    pub fn resize(&mut self, width: u32, height: u32) {
        let new_width = width.max(self.width);
        let new_height = height.max(self.height);

        if new_width > self.width {
            self.free_rects.push(Rect::new(
                self.width,
                0,
                new_width - self.width,
                new_height,
            ));
        }

        if new_height > self.height {
            self.free_rects.push(Rect::new(
                0,
                self.height,
                self.width,
                new_height - self.height,
            ));
        }

        self.width = new_width;
        self.height = new_height;
    }

    /// Double the shorter axis (width on ties) so the canvas trends square.
    ///
    /// Returns `false` and leaves the canvas alone when the doubled edge
    /// would not fit in `u32`.
    pub fn grow(&mut self) -> bool {
        let (width, height) = self.size();
        let grown = if width <= height {
            width.checked_mul(2).map(|w| (w, height))
        } else {
            height.checked_mul(2).map(|h| (width, h))
        };
        let Some((width, height)) = grown else {
            return false;
        };
        tracing::debug!("Growing atlas canvas to {}x{}", width, height);
        self.resize(width, height);
        true
    }

    /// Forget every placement
    pub fn clear(&mut self) {
        self.free_rects.clear();
        self.free_rects.push(Rect::new(0, 0, self.width, self.height));
        self.used_rects.clear();
    }

    /// Fraction of the canvas covered by placements
    pub fn occupancy(&self) -> f32 {
        let total = self.width as u64 * self.height as u64;
        if total == 0 {
            return 0.0;
        }
        let used: u64 = self.used_rects.iter().map(Rect::area).sum();
        used as f32 / total as f32
    }
}
