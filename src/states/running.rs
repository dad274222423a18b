//! The arena: player, wandering civilians, camera and crosshair

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::{FrameContext, GameState, Services};
use crate::consts::{ARENA_COLOR, CIVILIAN_SPAWN_INSET, FOREST_OFFSET, MAX_SCREEN_TILES};
use crate::error::{Result, SimError};
use crate::platform::{NodeId, NodeKind, NodeTransform, Resources, Scene, Texture};
use crate::sim::{
    ActionExecutor, AiPerson, Appearance, BehaviorContext, Camera, Crosshair, Liveness, Person,
    Player, Rect, Registry, RegistryHandle, Transition, WanderBehavior,
};
use crate::tunables::{ListenerId, Variables};

/// Scene nodes drawing one person
#[derive(Debug, Clone, Copy)]
struct PersonNodes {
    body: NodeId,
    hand: Option<NodeId>,
}

/// Tunable changes waiting for the next update
#[derive(Debug, Default)]
struct PendingChanges {
    hand_offset: Cell<Option<f32>>,
    civilian_speed: Cell<Option<f32>>,
}

/// Everything the phase owns between `enter` and `exit`
struct World {
    rng: Pcg32,
    executor: ActionExecutor,

    player: Player,
    player_nodes: PersonNodes,
    civilians: Registry<AiPerson>,
    civilian_nodes: HashMap<RegistryHandle, PersonNodes>,

    camera: Camera,
    crosshair: Crosshair,
    /// World-space root; bounds, forests and people hang off it
    camera_node: NodeId,
    crosshair_node: NodeId,

    pending: Rc<PendingChanges>,
    subscriptions: Vec<(&'static str, ListenerId)>,
}

pub struct RunningState {
    resources: Resources,
    world: Option<World>,
}

impl RunningState {
    pub fn new(resources: Resources) -> Self {
        Self {
            resources,
            world: None,
        }
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn player(&self) -> Option<&Player> {
        self.world.as_ref().map(|w| &w.player)
    }

    pub fn civilians(&self) -> Option<&Registry<AiPerson>> {
        self.world.as_ref().map(|w| &w.civilians)
    }

    pub fn crosshair(&self) -> Option<Crosshair> {
        self.world.as_ref().map(|w| w.crosshair)
    }

    pub fn camera(&self) -> Option<Camera> {
        self.world.as_ref().map(|w| w.camera)
    }

    fn spawn_nodes(&self, scene: &dyn Scene, parent: NodeId, person: &Person) -> PersonNodes {
        let body = scene.create_node(
            NodeKind::Sprite(self.resources.texture(person.appearance.body)),
            Some(parent),
        );
        let hand = person.appearance.hand.map(|texture| {
            scene.create_node(NodeKind::Sprite(self.resources.texture(texture)), Some(body))
        });
        let nodes = PersonNodes { body, hand };
        sync_person(scene, nodes, person);
        nodes
    }
}

impl GameState for RunningState {
    fn name(&self) -> &'static str {
        "running"
    }

    fn enter(&mut self, services: &Services) {
        let scene = services.scene.as_ref();
        let vars: &Variables = &services.variables;
        let viewport = scene.viewport();
        let hand_offset = vars.hand_offset.get();

        let camera_node = scene.create_node(NodeKind::Container, None);
        let bounds_node = scene.create_node(NodeKind::Graphics, Some(camera_node));
        draw_arena(scene, bounds_node, vars);

        let player = Player::new(Person::new(
            Appearance {
                body: Texture::Player,
                hand: Some(Texture::Fingergun),
            },
            viewport / 2.0,
            hand_offset,
        ));
        let player_nodes = self.spawn_nodes(scene, camera_node, &player.person);
        let camera = Camera::centered(viewport, player.person.position);
        scene.set_camera(camera_node, camera.anchor, camera.pivot);

        let mut rng = Pcg32::seed_from_u64(services.settings.seed);
        let mut civilians = Registry::new();
        let mut civilian_nodes = HashMap::new();
        let stage = Vec2::new(vars.stage_width.get(), vars.stage_height.get());
        for origin in screen_tiles(viewport, stage) {
            let forest = scene.create_node(
                NodeKind::Sprite(self.resources.texture(Texture::Forest)),
                Some(camera_node),
            );
            scene.set_transform(forest, NodeTransform::at(origin + Vec2::splat(FOREST_OFFSET)));

            let spawn = origin + Vec2::splat(viewport.y - CIVILIAN_SPAWN_INSET);
            let person = Person::new(
                Appearance {
                    body: Texture::Citizen,
                    hand: None,
                },
                spawn,
                hand_offset,
            );
            let mut civilian = AiPerson::new(person, vars.civilian_speed.get());
            let mut ctx = BehaviorContext {
                variables: vars,
                rng: &mut rng,
            };
            civilian.set_behavior(Box::new(WanderBehavior::from_tunables()), &mut ctx);

            let nodes = self.spawn_nodes(scene, camera_node, &civilian.person);
            let handle = civilians.register(civilian);
            civilian_nodes.insert(handle, nodes);
        }
        log::info!(
            "Spawned {} civilians across a {}x{} arena",
            civilians.len(),
            stage.x,
            stage.y
        );

        let crosshair = Crosshair::new(player.person.position + Vec2::new(0.0, hand_offset));
        let crosshair_node = scene.create_node(
            NodeKind::Sprite(self.resources.texture(Texture::Crosshair)),
            None,
        );
        scene.set_transform(crosshair_node, NodeTransform::at(crosshair.position));

        let mut subscriptions = Vec::new();
        for tunable in [&vars.stage_width, &vars.stage_height] {
            let scene = Rc::clone(&services.scene);
            let variables = Rc::downgrade(&services.variables);
            let id = tunable.subscribe(move |_, _| {
                if let Some(variables) = variables.upgrade() {
                    draw_arena(scene.as_ref(), bounds_node, &variables);
                }
            });
            subscriptions.push((tunable.name(), id));
        }

        let pending = Rc::new(PendingChanges::default());
        let sink = Rc::clone(&pending);
        let id = vars
            .hand_offset
            .subscribe(move |_, new| sink.hand_offset.set(Some(*new)));
        subscriptions.push((vars.hand_offset.name(), id));
        let sink = Rc::clone(&pending);
        let id = vars
            .civilian_speed
            .subscribe(move |_, new| sink.civilian_speed.set(Some(*new)));
        subscriptions.push((vars.civilian_speed.name(), id));

        self.world = Some(World {
            rng,
            executor: ActionExecutor::default(),
            player,
            player_nodes,
            civilians,
            civilian_nodes,
            camera,
            crosshair,
            camera_node,
            crosshair_node,
            pending,
            subscriptions,
        });
    }

    fn exit(&mut self, services: &Services) {
        let Some(mut world) = self.world.take() else {
            return;
        };

        for (name, id) in world.subscriptions.drain(..) {
            if let Some(tunable) = services.variables.find(name) {
                tunable.unwatch(id);
            }
        }

        let released = world.civilians.drain();
        log::info!("Released {} civilians", released.len());

        // Children of the camera node go with it
        services.scene.destroy_node(world.camera_node);
        services.scene.destroy_node(world.crosshair_node);
    }

    fn update(
        &mut self,
        services: &Services,
        frame: &FrameContext<'_>,
    ) -> Result<Transition<Box<dyn GameState>>> {
        let Some(world) = self.world.as_mut() else {
            return Ok(Transition::Stay);
        };

        world.update(services, frame)?;
        world.sync(services.scene.as_ref());
        Ok(Transition::Stay)
    }
}

impl World {
    fn update(&mut self, services: &Services, frame: &FrameContext<'_>) -> Result<()> {
        let vars: &Variables = &services.variables;
        let scene = services.scene.as_ref();
        let viewport = scene.viewport();

        self.apply_pending();

        let bounds = Rect::new(0.0, 0.0, vars.stage_width.get(), vars.stage_height.get());
        let aim = self.crosshair.aim(viewport);
        self.player.update(
            frame.input,
            bounds,
            aim,
            vars.player_speed.get(),
            frame.dt_ms,
        );

        let mut ctx = BehaviorContext {
            variables: vars,
            rng: &mut self.rng,
        };
        let executor = &self.executor;
        let mut failure: Option<SimError> = None;
        self.civilians.for_each_alive(|_, civilian| {
            if failure.is_none() {
                if let Err(e) = civilian.update(frame.dt_ms, executor, &mut ctx) {
                    failure = Some(e);
                }
            }
            Liveness::Alive
        });
        if let Some(e) = failure {
            return Err(e);
        }

        self.camera.anchor = viewport / 2.0;
        self.camera.focus(self.player.person.position);
        self.crosshair.integrate(frame.input.cursor.delta, viewport);
        Ok(())
    }

    fn apply_pending(&mut self) {
        if let Some(offset) = self.pending.hand_offset.take() {
            self.player.person.set_hand_radius(offset);
            for (_, civilian) in self.civilians.iter_mut() {
                civilian.person.set_hand_radius(offset);
            }
        }
        if let Some(speed) = self.pending.civilian_speed.take() {
            for (_, civilian) in self.civilians.iter_mut() {
                civilian.speed = speed;
            }
        }
    }

    fn sync(&self, scene: &dyn Scene) {
        scene.set_camera(self.camera_node, self.camera.anchor, self.camera.pivot);
        sync_person(scene, self.player_nodes, &self.player.person);
        for (handle, civilian) in self.civilians.iter() {
            if let Some(nodes) = self.civilian_nodes.get(&handle) {
                sync_person(scene, *nodes, &civilian.person);
            }
        }
        scene.set_transform(self.crosshair_node, NodeTransform::at(self.crosshair.position));
    }
}

fn sync_person(scene: &dyn Scene, nodes: PersonNodes, person: &Person) {
    scene.set_transform(nodes.body, NodeTransform::at(person.position));
    if let Some(hand) = nodes.hand {
        let pose = person.hand();
        scene.set_transform(
            hand,
            NodeTransform {
                position: pose.offset,
                rotation: pose.rotation,
                scale: Vec2::new(1.0, if pose.mirrored { -1.0 } else { 1.0 }),
            },
        );
    }
}

fn draw_arena(scene: &dyn Scene, node: NodeId, vars: &Variables) {
    let rect = Rect::new(0.0, 0.0, vars.stage_width.get(), vars.stage_height.get());
    scene.fill_rect(node, rect, ARENA_COLOR);
}

/// Top-left corners of the screen-sized tiles covering the stage
fn screen_tiles(viewport: Vec2, stage: Vec2) -> Vec<Vec2> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Vec::new();
    }
    let columns = (stage.x / viewport.x).ceil().max(0.0);
    let rows = (stage.y / viewport.y).ceil().max(0.0);
    let tiles = columns * rows;
    if !tiles.is_finite() || tiles > MAX_SCREEN_TILES as f32 {
        log::warn!(
            "Stage {}x{} spans {tiles} screens, more than {MAX_SCREEN_TILES}; not populating it",
            stage.x,
            stage.y
        );
        return Vec::new();
    }
    let (columns, rows) = (columns as u32, rows as u32);
    (0..rows)
        .flat_map(|i| {
            (0..columns).map(move |j| Vec2::new(j as f32 * viewport.x, i as f32 * viewport.y))
        })
        .collect()
}
