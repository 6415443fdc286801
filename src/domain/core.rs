//! Core geometry shared by the screen layouts
//!
//! Pure value types in logical pixels. The renderer maps them onto a pixmap,
//! nothing here knows about rasterization.

use serde::{Deserialize, Serialize};

/// Rectangle in logical pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    /// Creates a new rectangle
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle anchored at the origin
    pub fn from_size(w: i32, h: i32) -> Self {
        Self::new(0, 0, w, h)
    }

    /// Returns the right edge coordinate
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Returns the bottom edge coordinate
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Shrinks the rectangle by `dx` on the left/right and `dy` on top/bottom
    pub fn inset(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.x + dx,
            self.y + dy,
            (self.w - 2 * dx).max(0),
            (self.h - 2 * dy).max(0),
        )
    }

    /// Splits off a horizontal band of `height` at the top
    ///
    /// Returns the band and the remainder below it.
    pub fn take_top(&self, height: i32) -> (Rect, Rect) {
        let height = height.clamp(0, self.h.max(0));
        (
            Rect::new(self.x, self.y, self.w, height),
            Rect::new(self.x, self.y + height, self.w, self.h - height),
        )
    }

    /// Returns true if the rectangle overlaps `other` at all
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Linear interpolation between `from` and `to`
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges() {
        let rect = Rect::new(10, 20, 100, 50);
        assert_eq!(rect.right(), 110);
        assert_eq!(rect.bottom(), 70);
    }

    #[test]
    fn inset_never_goes_negative() {
        let rect = Rect::from_size(10, 10);
        assert_eq!(rect.inset(2, 3), Rect::new(2, 3, 6, 4));
        assert_eq!(rect.inset(8, 8), Rect::new(8, 8, 0, 0));
    }

    #[test]
    fn take_top_splits_band() {
        let (band, rest) = Rect::new(0, 10, 100, 50).take_top(20);
        assert_eq!(band, Rect::new(0, 10, 100, 20));
        assert_eq!(rest, Rect::new(0, 30, 100, 30));
    }

    #[test]
    fn intersects_detects_overlap() {
        let a = Rect::new(0, 0, 20, 20);
        assert!(a.intersects(&Rect::new(10, 10, 20, 20)));
        assert!(!a.intersects(&Rect::new(20, 0, 5, 5))); // Touching edge only
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(390.0, -200.0, 0.0), 390.0);
        assert_eq!(lerp(390.0, -200.0, 1.0), -200.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }
}
