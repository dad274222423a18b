//! Simulation module
//!
//! Entities, their decision logic and the registry of alive civilians.
//! Nothing here talks to the renderer or the asset loader:
//! - Elapsed time in milliseconds only
//! - Randomness through a caller-supplied RNG
//! - Tunables read through `&Variables`

pub mod action;
pub mod ai_person;
pub mod behavior;
pub mod camera;
pub mod person;
pub mod player;
pub mod rect;
pub mod registry;

pub use action::{Action, ActionExecutor, ActionHandler, ActionKind, ActionQueue, walk_to};
pub use ai_person::AiPerson;
pub use behavior::{
    Behavior, BehaviorContext, IdleBehavior, WanderBehavior, WanderParams, WanderSource,
};
pub use camera::{Camera, Crosshair};
pub use person::{Appearance, HandPose, Person};
pub use player::Player;
pub use rect::Rect;
pub use registry::{Liveness, Registry, RegistryHandle};

/// Result of a behavior or phase update
pub enum Transition<T> {
    /// Keep the current one
    Stay,
    /// Replace it with this
    Switch(T),
}

impl<T> Transition<T> {
    pub fn is_switch(&self) -> bool {
        matches!(self, Transition::Switch(_))
    }
}
