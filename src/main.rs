//! Fingergun - headless native driver
//!
//! Wires the headless scene and scripted asset loader into a [`Game`],
//! drives it with scripted input and tweaks tunables through the panel
//! mid-run, the way a developer would from the on-screen panel.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::rc::Rc;

    use fingergun::input::InputState;
    use fingergun::panel::DevelopmentPanel;
    use fingergun::platform::headless::{HeadlessScene, ScriptedAssets};
    use fingergun::states::{Game, Services};
    use fingergun::{Settings, Variables};
    use glam::Vec2;

    const FRAMES: u32 = 600;
    const FRAME_MS: f64 = 16.0;

    env_logger::init();
    log::info!("Fingergun (headless) starting...");

    let settings = Settings::load();
    let variables = Rc::new(Variables::from_settings(&settings));
    let scene = Rc::new(HeadlessScene::new(Vec2::new(832.0, 624.0)));
    let services = Services {
        scene: scene.clone(),
        assets: Rc::new(ScriptedAssets::completing_after(3)),
        variables: variables.clone(),
        settings: settings.clone(),
    };
    log::info!("Game initialized with seed: {}", settings.seed);

    let mut panel = DevelopmentPanel::new(variables.clone());
    let mut game = Game::new(services);
    let mut input = InputState::default();

    for frame in 0..FRAMES {
        match frame {
            60 => {
                input.key_down("w");
                input.key_down("d");
            }
            180 => {
                input.key_up("w");
                input.key_up("d");
                input.key_down("a");
            }
            240 => {
                input.key_up("a");
                if let Err(e) = panel.edit("stageWidth", "1200") {
                    log::warn!("{e}");
                }
                if let Err(e) = panel.edit("civilianSpeed", "fast") {
                    log::warn!("{e}");
                }
                if let Err(e) = panel.edit("civilianSpeed", "0.5") {
                    log::warn!("{e}");
                }
            }
            400 => panel.reset(),
            _ => {}
        }
        if frame % 30 == 0 {
            input.cursor_moved_by(Vec2::new(12.0, -4.0));
        }

        if let Err(e) = game.frame(f64::from(frame) * FRAME_MS, &input) {
            log::error!("Stopping after frame {frame}: {e}");
            break;
        }
        input.end_frame();

        panel.debug_value("state", game.state_name());
        panel.debug_value("nodes", scene.node_count());
    }

    for row in panel.rows() {
        log::info!("{} = {}", row.name, row.label);
    }
    for (name, value) in panel.debug_rows() {
        log::info!("debug {name}: {value}");
    }
    match variables.snapshot(settings.seed).to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Could not export settings: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // A browser host drives `Game::frame` from its animation callback
}
