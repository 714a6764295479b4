//! # Rendering Collaborators
//!
//! The game core decides *what* is drawn and *where*. Producing pixels,
//! loading files and camera projection belong to the host and are reached
//! through the three traits below.
//!
//! ```text
//! WorldManager ──draw_world/draw_screen──> RenderSink::draw(&DrawCommand)
//!      │                                        ▲
//!      ├── Camera (position, zoom, screen_to_world)
//!      └── AssetProvider (textures + atlas sprites, construction only)
//! ```

use bytemuck::{Pod, Zeroable};
use prospector_shared::Vec2;

use crate::error::AssetError;

/// Opaque id of a texture owned by the asset provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Axis-aligned rectangle in texture pixels.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Width and height as a vector.
    #[must_use]
    pub const fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// A loaded texture.
///
/// Not `Clone`: the value is handed back to [`AssetProvider::release`]
/// exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct Texture {
    /// Provider id.
    pub handle: TextureHandle,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Texture {
    /// Size in pixels as a vector.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// A region of an atlas texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    /// The atlas texture.
    pub texture: TextureHandle,
    /// Source bounds inside the atlas.
    pub source: Rect,
}

impl Sprite {
    /// Rotation origin: the centre of the source bounds.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        self.source.size() * 0.5
    }
}

/// RGBA multiplier applied when drawing.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct Tint(pub [u8; 4]);

impl Tint {
    /// No tint.
    pub const WHITE: Self = Self([255, 255, 255, 255]);
}

impl Default for Tint {
    fn default() -> Self {
        Self::WHITE
    }
}

/// What a draw command samples from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawSource {
    /// An atlas region.
    Sprite(Sprite),
    /// A whole texture.
    Texture(TextureHandle),
}

/// A single draw submission.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    /// What to draw.
    pub source: DrawSource,
    /// Destination position (world space for the world pass, screen space
    /// for the screen pass).
    pub position: Vec2,
    /// Rotation and scaling origin in source pixels.
    pub origin: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// Uniform scale.
    pub scale: f32,
    /// Colour multiplier.
    pub tint: Tint,
}

impl DrawCommand {
    /// Draws a sprite centred on `position`.
    #[must_use]
    pub fn sprite(sprite: Sprite, position: Vec2, rotation: f32) -> Self {
        Self {
            source: DrawSource::Sprite(sprite),
            position,
            origin: sprite.origin(),
            rotation,
            scale: 1.0,
            tint: Tint::WHITE,
        }
    }

    /// Draws a whole texture with its top-left corner at `position`.
    #[must_use]
    pub fn texture(texture: TextureHandle, position: Vec2, scale: f32) -> Self {
        Self {
            source: DrawSource::Texture(texture),
            position,
            origin: Vec2::ZERO,
            rotation: 0.0,
            scale,
            tint: Tint::WHITE,
        }
    }
}

/// Texture and sprite-atlas loading.
///
/// Called only while a world is being built or torn down.
pub trait AssetProvider {
    /// Loads a texture by name.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::AssetLoadFailure`] if the provider cannot load it.
    fn load_texture(&mut self, name: &str) -> Result<Texture, AssetError>;

    /// Looks up a sprite inside an atlas.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::SpriteNotFound`] for unknown atlases or sprites.
    fn sprite(&mut self, atlas: &str, name: &str) -> Result<Sprite, AssetError>;

    /// Returns a texture to the provider.
    fn release(&mut self, texture: Texture);
}

/// Receives draw submissions.
pub trait RenderSink {
    /// Submits one command.
    fn draw(&mut self, command: &DrawCommand);
}

/// The view onto the world.
pub trait Camera {
    /// World position the camera looks at.
    fn position(&self) -> Vec2;

    /// Zoom factor, 1.0 = one world unit per pixel.
    fn zoom(&self) -> f32;

    /// Converts a screen pixel into world space.
    fn screen_to_world(&self, point: Vec2) -> Vec2;
}

/// Placement of the parallax background for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parallax {
    /// Screen position of the background's top-left corner.
    pub position: Vec2,
    /// Background scale.
    pub scale: f32,
}

/// Computes the parallax background placement.
///
/// The background scrolls at `background_size / world_size` of the camera
/// rate and its zoom is pulled toward 1.0 by the same proportion, so it
/// appears far behind the playfield.
///
/// `screen_origin_world` is the world position under screen pixel (0, 0).
#[must_use]
pub fn parallax(world_size: Vec2, background_size: Vec2, zoom: f32, screen_origin_world: Vec2) -> Parallax {
    let proportional = background_size.x / world_size.x;
    let scale = 1.0 - (1.0 - zoom) * proportional;
    let offset = ((screen_origin_world / world_size) * background_size) * scale;

    Parallax {
        position: -offset,
        scale,
    }
}
