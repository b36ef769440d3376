//! Small 2D vector and rectangle types

/// 2D float vector (sizes, bearings, scales, UVs)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Round each axis with `floor(v + 0.5)`
    pub fn round_half_up(self) -> IVec2 {
        IVec2::new(round_half_up(self.x), round_half_up(self.y))
    }
}

/// 2D integer vector (pixel sizes, bearings)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IVec2 {
    pub x: i32,
    pub y: i32,
}

impl IVec2 {
    pub const ZERO: IVec2 = IVec2 { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

/// Integer rectangle in canvas pixel space (top-left origin)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Can fit a rect of the given size
    pub fn can_fit(&self, width: u32, height: u32) -> bool {
        self.width >= width && self.height >= height
    }

    /// Shrink by `amount` on every side, collapsing to zero size
    pub fn inset(&self, amount: u32) -> Rect {
        let width = self.width.saturating_sub(amount.saturating_mul(2));
        let height = self.height.saturating_sub(amount.saturating_mul(2));
        Rect::new(
            self.x + amount.min(self.width / 2),
            self.y + amount.min(self.height / 2),
            width,
            height,
        )
    }

    /// True when the two rects share at least one pixel
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// True when `other` lies entirely inside this rect
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Corners normalized by the canvas size: (min, max)
    pub fn uv(&self, canvas_width: u32, canvas_height: u32) -> (Vec2, Vec2) {
        let inv_w = 1.0 / canvas_width as f32;
        let inv_h = 1.0 / canvas_height as f32;
        (
            Vec2::new(self.x as f32 * inv_w, self.y as f32 * inv_h),
            Vec2::new(self.right() as f32 * inv_w, self.bottom() as f32 * inv_h),
        )
    }
}

/// `floor(v + 0.5)`; rounds halves up, never to even
pub fn round_half_up(v: f32) -> i32 {
    (v + 0.5).floor() as i32
}

/// Smallest power of two >= `v` (1 for 0), `None` past 2^31
pub fn next_pow2(v: u32) -> Option<u32> {
    v.max(1).checked_next_power_of_two()
}
