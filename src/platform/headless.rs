//! Headless collaborators for tests and the native demo
//!
//! [`HeadlessScene`] keeps a node table instead of drawing anything.
//! [`ScriptedAssets`] completes (or fails) a load after a fixed number of polls.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use glam::Vec2;

use super::{
    AssetLoader, LoadHandle, LoadStatus, NodeId, NodeKind, NodeTransform, Scene, Texture,
    TextureHandle,
};
use crate::sim::Rect;

/// Recorded state of one node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub transform: NodeTransform,
    pub visible: bool,
    /// Last rectangle filled into a graphics node
    pub fill: Option<(Rect, u32)>,
    /// Camera placement for containers
    pub camera: Option<(Vec2, Vec2)>,
}

pub struct HeadlessScene {
    viewport: Cell<Vec2>,
    nodes: RefCell<HashMap<NodeId, NodeRecord>>,
    next_id: Cell<u32>,
    created: Cell<usize>,
}

impl HeadlessScene {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            viewport: Cell::new(viewport),
            nodes: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
            created: Cell::new(0),
        }
    }

    pub fn node(&self, node: NodeId) -> Option<NodeRecord> {
        self.nodes.borrow().get(&node).cloned()
    }

    /// Nodes currently alive
    pub fn node_count(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Nodes ever created
    pub fn created_count(&self) -> usize {
        self.created.get()
    }

    pub fn count_where(&self, f: impl Fn(&NodeRecord) -> bool) -> usize {
        self.nodes.borrow().values().filter(|n| f(n)).count()
    }

    fn with_node(&self, node: NodeId, f: impl FnOnce(&mut NodeRecord)) {
        match self.nodes.borrow_mut().get_mut(&node) {
            Some(record) => f(record),
            None => log::warn!("headless scene: node {node:?} does not exist"),
        }
    }
}

impl Scene for HeadlessScene {
    fn create_node(&self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.created.set(self.created.get() + 1);
        self.nodes.borrow_mut().insert(
            id,
            NodeRecord {
                kind,
                parent,
                transform: NodeTransform::default(),
                visible: true,
                fill: None,
                camera: None,
            },
        );
        id
    }

    fn destroy_node(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        let mut doomed = vec![node];
        while let Some(id) = doomed.pop() {
            if nodes.remove(&id).is_some() {
                doomed.extend(
                    nodes
                        .iter()
                        .filter(|(_, n)| n.parent == Some(id))
                        .map(|(child, _)| *child),
                );
            }
        }
    }

    fn set_transform(&self, node: NodeId, transform: NodeTransform) {
        self.with_node(node, |n| n.transform = transform);
    }

    fn set_visible(&self, node: NodeId, visible: bool) {
        self.with_node(node, |n| n.visible = visible);
    }

    fn set_texture(&self, node: NodeId, texture: TextureHandle) {
        self.with_node(node, |n| n.kind = NodeKind::Sprite(texture));
    }

    fn fill_rect(&self, node: NodeId, rect: Rect, color: u32) {
        self.with_node(node, |n| n.fill = Some((rect, color)));
    }

    fn set_camera(&self, node: NodeId, position: Vec2, pivot: Vec2) {
        self.with_node(node, |n| n.camera = Some((position, pivot)));
    }

    fn viewport(&self) -> Vec2 {
        self.viewport.get()
    }
}

/// How a scripted load ends
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedOutcome {
    Complete,
    Fail(String),
}

/// Asset loader that resolves after `polls_until_done` polls
pub struct ScriptedAssets {
    polls_until_done: u32,
    outcome: RefCell<ScriptedOutcome>,
    requests: RefCell<Vec<(LoadHandle, Vec<Texture>, u32)>>,
    next_handle: Cell<u32>,
}

impl ScriptedAssets {
    pub fn completing_after(polls: u32) -> Self {
        Self::new(polls, ScriptedOutcome::Complete)
    }

    pub fn failing_after(polls: u32, reason: &str) -> Self {
        Self::new(polls, ScriptedOutcome::Fail(reason.to_string()))
    }

    fn new(polls_until_done: u32, outcome: ScriptedOutcome) -> Self {
        Self {
            polls_until_done,
            outcome: RefCell::new(outcome),
            requests: RefCell::new(Vec::new()),
            next_handle: Cell::new(1),
        }
    }

    /// Change the outcome of requests not yet resolved
    pub fn set_outcome(&self, outcome: ScriptedOutcome) {
        self.outcome.replace(outcome);
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl AssetLoader for ScriptedAssets {
    fn request_load(&self, textures: &[Texture]) -> LoadHandle {
        let handle = LoadHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 1);
        self.requests
            .borrow_mut()
            .push((handle, textures.to_vec(), 0));
        handle
    }

    fn poll(&self, handle: LoadHandle) -> LoadStatus {
        let mut requests = self.requests.borrow_mut();
        let Some((_, textures, polls)) = requests.iter_mut().find(|(h, _, _)| *h == handle) else {
            return LoadStatus::Failed(format!("unknown load handle {}", handle.0));
        };

        *polls += 1;
        if *polls < self.polls_until_done {
            return LoadStatus::Pending;
        }
        match &*self.outcome.borrow() {
            ScriptedOutcome::Complete => LoadStatus::Complete(
                textures
                    .iter()
                    .enumerate()
                    .map(|(i, t)| (*t, TextureHandle(i as u32 + 1)))
                    .collect(),
            ),
            ScriptedOutcome::Fail(reason) => LoadStatus::Failed(reason.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destroy_removes_children() {
        let scene = HeadlessScene::new(Vec2::new(800.0, 600.0));
        let root = scene.create_node(NodeKind::Container, None);
        let child = scene.create_node(NodeKind::Graphics, Some(root));
        scene.create_node(NodeKind::Graphics, Some(child));
        let other = scene.create_node(NodeKind::Container, None);

        scene.destroy_node(root);
        assert_eq!(scene.node_count(), 1);
        assert!(scene.node(other).is_some());
        assert_eq!(scene.created_count(), 4);
    }

    #[test]
    fn test_scripted_assets_complete_after_polls() {
        let assets = ScriptedAssets::completing_after(3);
        let handle = assets.request_load(&Texture::ALL);
        assert_eq!(assets.poll(handle), LoadStatus::Pending);
        assert_eq!(assets.poll(handle), LoadStatus::Pending);
        let LoadStatus::Complete(table) = assets.poll(handle) else {
            panic!("expected completion");
        };
        assert_eq!(table.len(), Texture::ALL.len());
    }

    #[test]
    fn test_scripted_assets_fail() {
        let assets = ScriptedAssets::failing_after(1, "404");
        let handle = assets.request_load(&[Texture::Player]);
        assert_eq!(assets.poll(handle), LoadStatus::Failed("404".to_string()));
        assert!(matches!(assets.poll(LoadHandle(99)), LoadStatus::Failed(_)));
    }
}
