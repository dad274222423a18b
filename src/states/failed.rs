//! Shown when textures could not be loaded. Fire retries.

use super::{FrameContext, GameState, LoadingState, Services};
use crate::consts::{LOADING_COLOR, LOADING_FONT_SIZE};
use crate::error::Result;
use crate::input::InputAction;
use crate::platform::{NodeId, NodeKind, NodeTransform};
use crate::sim::Transition;

#[derive(Debug)]
pub struct FailedState {
    reason: String,
    text: Option<NodeId>,
}

impl FailedState {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            text: None,
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl GameState for FailedState {
    fn name(&self) -> &'static str {
        "failed"
    }

    fn enter(&mut self, services: &Services) {
        let scene = &services.scene;
        let text = scene.create_node(
            NodeKind::Text {
                content: format!("Loading failed: {}\nClick to retry", self.reason),
                font_size: LOADING_FONT_SIZE / 2.0,
                color: LOADING_COLOR,
            },
            None,
        );
        scene.set_transform(text, NodeTransform::at(scene.viewport() / 2.0));
        self.text = Some(text);
    }

    fn exit(&mut self, services: &Services) {
        if let Some(text) = self.text.take() {
            services.scene.destroy_node(text);
        }
    }

    fn update(
        &mut self,
        _services: &Services,
        frame: &FrameContext<'_>,
    ) -> Result<Transition<Box<dyn GameState>>> {
        if frame.input.just_pressed(InputAction::Fire) {
            log::info!("Retrying asset load");
            return Ok(Transition::Switch(Box::new(LoadingState::new())));
        }
        Ok(Transition::Stay)
    }
}
