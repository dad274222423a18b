//! The base entity shared by the player and civilians

use glam::Vec2;

use crate::platform::Texture;
use crate::{normalize_angle, polar_to_cartesian};

/// What a person looks like: body texture and held item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appearance {
    pub body: Texture,
    /// `None` for an empty hand
    pub hand: Option<Texture>,
}

/// Transform of the held item relative to the body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPose {
    pub offset: Vec2,
    pub rotation: f32,
    /// Vertical mirror, set while facing the left half-plane
    pub mirrored: bool,
}

impl HandPose {
    /// Pose for a facing `direction` and hand distance `radius`
    pub fn for_direction(direction: f32, radius: f32) -> Self {
        use std::f32::consts::FRAC_PI_2;
        Self {
            offset: polar_to_cartesian(radius, direction),
            rotation: direction,
            mirrored: direction <= -FRAC_PI_2 || direction >= FRAC_PI_2,
        }
    }
}

/// A person in the arena
#[derive(Debug, Clone)]
pub struct Person {
    pub position: Vec2,
    pub appearance: Appearance,
    /// Facing, radians in [-π, π)
    direction: f32,
    hand_radius: f32,
    hand: HandPose,
}

impl Person {
    pub fn new(appearance: Appearance, position: Vec2, hand_radius: f32) -> Self {
        Self {
            position,
            appearance,
            direction: 0.0,
            hand_radius,
            hand: HandPose::for_direction(0.0, hand_radius),
        }
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn hand(&self) -> HandPose {
        self.hand
    }

    pub fn hand_radius(&self) -> f32 {
        self.hand_radius
    }

    /// Set the facing. The hand pose follows immediately.
    pub fn set_direction(&mut self, value: f32) {
        let value = normalize_angle(value);
        if value == self.direction {
            return;
        }
        self.direction = value;
        self.hand = HandPose::for_direction(value, self.hand_radius);
    }

    pub fn set_hand_radius(&mut self, radius: f32) {
        if radius == self.hand_radius {
            return;
        }
        self.hand_radius = radius;
        self.hand = HandPose::for_direction(self.direction, radius);
    }

    /// Face toward a world position
    pub fn look_at(&mut self, target: Vec2) {
        let d = target - self.position;
        self.set_direction(d.y.atan2(d.x));
    }
}
