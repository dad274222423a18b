//! Game phases and the frame driver
//!
//! Exactly one [`GameState`] is active. Each frame the [`Game`] updates it;
//! a returned [`Transition::Switch`] makes the driver run `exit` on the old
//! phase and `enter` on the new one, in that order, before the next update.

mod failed;
mod loading;
mod running;

pub use failed::FailedState;
pub use loading::LoadingState;
pub use running::RunningState;

use std::rc::Rc;

use crate::consts::MAX_FRAME_MS;
use crate::error::Result;
use crate::input::InputState;
use crate::platform::{AssetLoader, Scene};
use crate::settings::Settings;
use crate::sim::Transition;
use crate::tunables::Variables;

/// Collaborators shared by every phase
#[derive(Clone)]
pub struct Services {
    pub scene: Rc<dyn Scene>,
    pub assets: Rc<dyn AssetLoader>,
    pub variables: Rc<Variables>,
    pub settings: Settings,
}

/// Per-frame inputs
pub struct FrameContext<'a> {
    pub input: &'a InputState,
    /// Elapsed time in milliseconds, already clamped by the driver
    pub dt_ms: f32,
}

pub trait GameState {
    fn name(&self) -> &'static str;

    /// Allocate presentation and entities
    fn enter(&mut self, services: &Services);

    /// Release everything `enter` allocated
    fn exit(&mut self, services: &Services);

    fn update(
        &mut self,
        services: &Services,
        frame: &FrameContext<'_>,
    ) -> Result<Transition<Box<dyn GameState>>>;
}

/// Owns the active phase and drives it from host frame callbacks
pub struct Game {
    services: Services,
    state: Box<dyn GameState>,
    last_time_ms: Option<f64>,
}

impl Game {
    /// Start in the loading phase
    pub fn new(services: Services) -> Self {
        Self::with_state(services, Box::new(LoadingState::new()))
    }

    pub fn with_state(services: Services, mut state: Box<dyn GameState>) -> Self {
        log::info!("Entering {}", state.name());
        state.enter(&services);
        Self {
            services,
            state,
            last_time_ms: None,
        }
    }

    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Host frame callback with an absolute timestamp.
    ///
    /// The first frame simulates zero time; later frames are clamped to
    /// [`MAX_FRAME_MS`]. A non-finite timestamp simulates zero time and is
    /// not remembered.
    pub fn frame(&mut self, now_ms: f64, input: &InputState) -> Result<()> {
        let dt_ms = match self.last_time_ms {
            Some(last) => (now_ms - last) as f32,
            None => 0.0,
        };
        if now_ms.is_finite() {
            self.last_time_ms = Some(now_ms);
        }
        self.step(dt_ms, input)
    }

    /// Advance one frame by `dt_ms`, clamped to `0..=MAX_FRAME_MS`
    pub fn step(&mut self, dt_ms: f32, input: &InputState) -> Result<()> {
        let dt_ms = if dt_ms.is_finite() {
            dt_ms.clamp(0.0, MAX_FRAME_MS)
        } else {
            log::warn!("ignoring non-finite frame time {dt_ms}");
            0.0
        };
        let frame = FrameContext { input, dt_ms };
        match self.state.update(&self.services, &frame) {
            Ok(Transition::Stay) => Ok(()),
            Ok(Transition::Switch(next)) => {
                self.switch_to(next);
                Ok(())
            }
            Err(e) => {
                log::error!("{} update failed: {e}", self.state.name());
                Err(e)
            }
        }
    }

    fn switch_to(&mut self, mut next: Box<dyn GameState>) {
        log::info!("{} -> {}", self.state.name(), next.name());
        self.state.exit(&self.services);
        next.enter(&self.services);
        self.state = next;
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        self.state.exit(&self.services);
    }
}
