//! Axis-aligned rectangles in field coordinates.
//!
//! Field coordinates follow screen conventions: `x` grows to the right and
//! `y` grows downward, so `top <= bottom` for a well-formed rect.

use glam::Vec2;

/// An axis-aligned rectangle with `f32` bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
}

impl Rect {
    /// Create a rect from its four edges.
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Create a rect from its top-left corner and size.
    pub fn from_origin_size(origin: Vec2, width: f32, height: f32) -> Self {
        Self::new(origin.x, origin.y, origin.x + width, origin.y + height)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new((self.left + self.right) * 0.5, (self.top + self.bottom) * 0.5)
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    /// Whether the rect encloses no area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Translate by `delta`.
    pub fn offset(&self, delta: Vec2) -> Self {
        Self::new(
            self.left + delta.x,
            self.top + delta.y,
            self.right + delta.x,
            self.bottom + delta.y,
        )
    }

    /// Shrink each side by `dx` horizontally and `dy` vertically.
    ///
    /// Negative insets grow the rect.
    pub fn inset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.left + dx, self.top + dy, self.right - dx, self.bottom - dy)
    }

    /// Shrink (or grow) this rect around its center so that it has the given
    /// size, moving each edge by a whole number of pixels.
    ///
    /// Used to fit an expanded bound back onto the raster it was captured from.
    pub fn centered_to(&self, width: f32, height: f32) -> Self {
        let dx = ((self.width() - width) / 2.0).trunc();
        let dy = ((self.height() - height) / 2.0).trunc();
        self.inset(dx, dy)
    }

    /// Map `point` through a uniform scale of `factor` about `pivot`.
    pub fn scale_point_about(point: Vec2, pivot: Vec2, factor: f32) -> Vec2 {
        pivot + (point - pivot) * factor
    }

    /// Scale the rect's size by `factor` about `pivot`.
    pub fn scaled_about(&self, pivot: Vec2, factor: f32) -> Self {
        let min = Self::scale_point_about(self.origin(), pivot, factor);
        let max = Self::scale_point_about(Vec2::new(self.right, self.bottom), pivot, factor);
        Self::new(min.x, min.y, max.x, max.y)
    }
}
