//! Platform abstraction layer
//!
//! The simulation talks to the outside world only through these traits:
//! - [`Scene`]: visual nodes, camera and viewport size
//! - [`AssetLoader`]: non-blocking texture loading
//!
//! Collaborator methods take `&self`; implementations own their interior
//! mutability so handles can be shared with tunable listeners.

pub mod headless;

use std::collections::HashMap;

use glam::Vec2;

use crate::sim::Rect;

/// Opaque renderer-side texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// The fixed set of textures the game needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Texture {
    Player,
    Crosshair,
    Fingergun,
    Citizen,
    Farmer,
    Money,
    Torch,
    Forest,
    Gun,
}

impl Texture {
    pub const ALL: [Texture; 9] = [
        Texture::Player,
        Texture::Crosshair,
        Texture::Fingergun,
        Texture::Citizen,
        Texture::Farmer,
        Texture::Money,
        Texture::Torch,
        Texture::Forest,
        Texture::Gun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Texture::Player => "player",
            Texture::Crosshair => "crosshair",
            Texture::Fingergun => "fingergun",
            Texture::Citizen => "citizen",
            Texture::Farmer => "farmer",
            Texture::Money => "money",
            Texture::Torch => "torch",
            Texture::Forest => "forest",
            Texture::Gun => "gun",
        }
    }

    pub fn path(&self) -> String {
        format!("assets/textures/{}.png", self.as_str())
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A complete texture table: every [`Texture`] has a handle
#[derive(Debug, Clone, PartialEq)]
pub struct Resources {
    textures: [TextureHandle; Texture::ALL.len()],
}

impl Resources {
    /// Fails with the first missing texture
    pub fn from_table(table: &HashMap<Texture, TextureHandle>) -> Result<Self, Texture> {
        let mut textures = [TextureHandle(0); Texture::ALL.len()];
        for texture in Texture::ALL {
            textures[texture.index()] = *table.get(&texture).ok_or(texture)?;
        }
        Ok(Self { textures })
    }

    pub fn texture(&self, texture: Texture) -> TextureHandle {
        self.textures[texture.index()]
    }
}

/// Identifies a resource fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadHandle(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Pending,
    Complete(HashMap<Texture, TextureHandle>),
    Failed(String),
}

pub trait AssetLoader {
    fn request_load(&self, textures: &[Texture]) -> LoadHandle;
    /// Non-blocking; called once per frame by the loading phase
    fn poll(&self, handle: LoadHandle) -> LoadStatus;
}

/// Identifies a visual node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Groups children; moved by the camera
    Container,
    Sprite(TextureHandle),
    Text {
        content: String,
        font_size: f32,
        color: u32,
    },
    /// Filled shapes, redrawn through [`Scene::fill_rect`]
    Graphics,
}

/// Local transform of a node relative to its parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}

impl NodeTransform {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Renderer collaborator
pub trait Scene {
    /// `parent = None` attaches to the stage root
    fn create_node(&self, kind: NodeKind, parent: Option<NodeId>) -> NodeId;
    /// Destroys the node and its children
    fn destroy_node(&self, node: NodeId);
    fn set_transform(&self, node: NodeId, transform: NodeTransform);
    fn set_visible(&self, node: NodeId, visible: bool);
    fn set_texture(&self, node: NodeId, texture: TextureHandle);
    /// Clear a graphics node and fill one rectangle
    fn fill_rect(&self, node: NodeId, rect: Rect, color: u32);
    /// Draw world `pivot` at screen `position` for a container
    fn set_camera(&self, node: NodeId, position: Vec2, pivot: Vec2);
    /// Current screen extent
    fn viewport(&self) -> Vec2;
}
