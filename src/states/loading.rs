//! Initial phase: fetch textures behind a placeholder

use super::{FailedState, FrameContext, GameState, RunningState, Services};
use crate::consts::{LOADING_COLOR, LOADING_FONT_SIZE};
use crate::error::Result;
use crate::platform::{LoadHandle, LoadStatus, NodeId, NodeKind, NodeTransform, Resources, Texture};
use crate::sim::Transition;

#[derive(Debug, Default)]
pub struct LoadingState {
    request: Option<LoadHandle>,
    text: Option<NodeId>,
}

impl LoadingState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameState for LoadingState {
    fn name(&self) -> &'static str {
        "loading"
    }

    fn enter(&mut self, services: &Services) {
        self.request = Some(services.assets.request_load(&Texture::ALL));

        let scene = &services.scene;
        let text = scene.create_node(
            NodeKind::Text {
                content: "Loading...".to_string(),
                font_size: LOADING_FONT_SIZE,
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
        self.request = None;
    }

    fn update(
        &mut self,
        services: &Services,
        _frame: &FrameContext<'_>,
    ) -> Result<Transition<Box<dyn GameState>>> {
        let Some(request) = self.request else {
            return Ok(Transition::Stay);
        };

        let next: Box<dyn GameState> = match services.assets.poll(request) {
            LoadStatus::Pending => return Ok(Transition::Stay),
            LoadStatus::Complete(table) => match Resources::from_table(&table) {
                Ok(resources) => {
                    log::info!("Loaded {} textures", table.len());
                    Box::new(RunningState::new(resources))
                }
                Err(missing) => {
                    log::warn!("Asset load finished without {}", missing.path());
                    Box::new(FailedState::new(format!("missing {}", missing.path())))
                }
            },
            LoadStatus::Failed(reason) => {
                log::warn!("Asset load failed: {reason}");
                Box::new(FailedState::new(reason))
            }
        };
        Ok(Transition::Switch(next))
    }
}
