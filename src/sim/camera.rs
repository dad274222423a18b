//! Camera focus and the screen-space crosshair

use glam::Vec2;

use super::rect::Rect;

/// Keeps the focused world point at the screen anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Screen position the pivot is drawn at
    pub anchor: Vec2,
    /// World position under the anchor
    pub pivot: Vec2,
}

impl Camera {
    /// Anchored at the viewport center
    pub fn centered(viewport: Vec2, pivot: Vec2) -> Self {
        Self {
            anchor: viewport / 2.0,
            pivot,
        }
    }

    pub fn focus(&mut self, target: Vec2) {
        self.pivot = target;
    }
}

/// Aim marker in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crosshair {
    pub position: Vec2,
}

impl Crosshair {
    pub fn new(position: Vec2) -> Self {
        Self { position }
    }

    /// Add relative cursor motion, clamped to the viewport
    pub fn integrate(&mut self, delta: Vec2, viewport: Vec2) {
        self.position = Rect::from_size(viewport).clamp(self.position + delta);
    }

    /// Offset from the viewport center, i.e. from a centered player
    pub fn aim(&self, viewport: Vec2) -> Vec2 {
        self.position - viewport / 2.0
    }
}
