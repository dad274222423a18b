//! Fingergun - a top-down arena with wandering civilians
//!
//! Core modules:
//! - `tunables`: Live-editable simulation parameters with change notification
//! - `sim`: Entities, behaviors, actions and the alive-entity registry
//! - `states`: Loading/Running/Failed phases and the frame driver
//! - `platform`: Renderer and asset-loader collaborator interfaces
//! - `input`: Button and cursor state fed by the host
//! - `panel`: Headless model of the development panel
//! - `settings`: Startup defaults for the tunables

pub mod error;
pub mod input;
pub mod panel;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod states;
pub mod tunables;

pub use error::{EditError, ParseError, SimError};
pub use settings::Settings;
pub use tunables::Variables;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Diagonal movement divisor, applied per axis when both axes are held
    pub const DIAGONAL_FACTOR: f32 = 1.4142;

    /// Longest frame the driver will simulate (milliseconds)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Default run seed
    pub const DEFAULT_SEED: u64 = 0x5EED_F1A6;

    /// Offset of the decorative forest inside each screen tile
    pub const FOREST_OFFSET: f32 = 20.0;
    /// Civilian spawn inset from the tile origin, subtracted from the screen height
    pub const CIVILIAN_SPAWN_INSET: f32 = 50.0;
    /// Screen tiles beyond this are not populated
    pub const MAX_SCREEN_TILES: usize = 4096;

    /// Arena fill color
    pub const ARENA_COLOR: u32 = 0x343434;
    /// Placeholder text color
    pub const LOADING_COLOR: u32 = 0xff1010;
    pub const LOADING_FONT_SIZE: f32 = 75.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Uniform value between `min` and `max`.
///
/// Total for any ordering of the bounds; `min > max` samples `(max, min]`.
#[inline]
pub fn rand_between<R: rand::RngCore + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    use rand::Rng;
    rng.random::<f32>() * (max - min) + min
}
