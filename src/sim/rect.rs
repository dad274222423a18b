//! Axis-aligned rectangles for the arena and the viewport

use glam::Vec2;

/// An axis-aligned rectangle in world or screen units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin
    pub fn from_size(size: Vec2) -> Self {
        Self::new(0.0, 0.0, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    /// Clamp each axis independently.
    ///
    /// The low bound is applied first, so a negative extent collapses onto
    /// the far edge instead of panicking like `f32::clamp`.
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            clamp_axis(point.x, self.left, self.right()),
            clamp_axis(point.y, self.top, self.bottom()),
        )
    }
}

#[inline]
fn clamp_axis(mut v: f32, low: f32, high: f32) -> f32 {
    if v < low {
        v = low;
    }
    if v > high {
        v = high;
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_inside_untouched() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(rect.clamp(Vec2::new(10.0, 20.0)), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_clamp_per_axis() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(rect.clamp(Vec2::new(-5.0, 20.0)), Vec2::new(0.0, 20.0));
        assert_eq!(rect.clamp(Vec2::new(150.0, 80.0)), Vec2::new(100.0, 50.0));
        assert_eq!(rect.clamp(Vec2::new(50.0, -1.0)), Vec2::new(50.0, 0.0));
    }

    #[test]
    fn test_negative_extent_collapses() {
        let rect = Rect::new(0.0, 0.0, -10.0, 10.0);
        assert_eq!(rect.clamp(Vec2::new(5.0, 5.0)).x, -10.0);
    }

    #[test]
    fn test_contains_and_center() {
        let rect = Rect::from_size(Vec2::new(800.0, 600.0));
        assert!(rect.contains(Vec2::new(800.0, 600.0)));
        assert!(!rect.contains(Vec2::new(801.0, 0.0)));
        assert_eq!(rect.center(), Vec2::new(400.0, 300.0));
    }
}
