//! # Headless Collaborators
//!
//! In-memory implementations of the render traits. They back the
//! simulation binary, the benches and the tests: textures are plain ids,
//! draws are recorded and the camera never moves on its own.

use std::collections::{HashMap, HashSet};

use prospector_shared::Vec2;

use crate::error::AssetError;
use crate::render::{AssetProvider, Camera, DrawCommand, Rect, RenderSink, Sprite, Texture, TextureHandle};

/// Texture size handed out when no override is set.
pub const DEFAULT_TEXTURE_SIZE: (u32, u32) = (2048, 2048);

/// Size of every atlas sprite.
pub const DEFAULT_SPRITE_SIZE: (u32, u32) = (64, 64);

/// Asset provider that fabricates textures and sprites on demand.
///
/// Names registered with [`HeadlessAssets::fail_on`] fail to load, both as
/// texture names and as sprite names.
#[derive(Debug)]
pub struct HeadlessAssets {
    sprite_size: (u32, u32),
    sizes: HashMap<String, (u32, u32)>,
    failing: HashSet<String>,
    atlases: HashMap<String, TextureHandle>,
    live: HashSet<TextureHandle>,
    next_handle: u32,
    loaded: usize,
    released: usize,
}

impl Default for HeadlessAssets {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessAssets {
    /// Creates a provider with default sizes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sprite_size: DEFAULT_SPRITE_SIZE,
            sizes: HashMap::new(),
            failing: HashSet::new(),
            atlases: HashMap::new(),
            live: HashSet::new(),
            next_handle: 1,
            loaded: 0,
            released: 0,
        }
    }

    /// Size of every sprite's source bounds.
    #[must_use]
    pub const fn with_sprite_size(mut self, width: u32, height: u32) -> Self {
        self.sprite_size = (width, height);
        self
    }

    /// Overrides the size of one texture.
    pub fn set_texture_size(&mut self, name: impl Into<String>, width: u32, height: u32) {
        self.sizes.insert(name.into(), (width, height));
    }

    /// Makes every request for `name` fail.
    pub fn fail_on(&mut self, name: impl Into<String>) {
        self.failing.insert(name.into());
    }

    /// Textures loaded and not yet released.
    #[must_use]
    pub fn live_textures(&self) -> usize {
        self.live.len()
    }

    /// Total successful texture loads.
    #[must_use]
    pub const fn loaded(&self) -> usize {
        self.loaded
    }

    /// Total releases.
    #[must_use]
    pub const fn released(&self) -> usize {
        self.released
    }

    fn allocate(&mut self) -> TextureHandle {
        let handle = TextureHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }
}

impl AssetProvider for HeadlessAssets {
    fn load_texture(&mut self, name: &str) -> Result<Texture, AssetError> {
        if self.failing.contains(name) {
            return Err(AssetError::AssetLoadFailure {
                name: name.to_owned(),
                reason: "marked as failing".to_owned(),
            });
        }

        let (width, height) = self.sizes.get(name).copied().unwrap_or(DEFAULT_TEXTURE_SIZE);
        let handle = self.allocate();
        self.live.insert(handle);
        self.loaded += 1;
        tracing::trace!(name, handle = handle.0, width, height, "texture loaded");
        Ok(Texture { handle, width, height })
    }

    fn sprite(&mut self, atlas: &str, name: &str) -> Result<Sprite, AssetError> {
        if self.failing.contains(atlas) || self.failing.contains(name) {
            return Err(AssetError::SpriteNotFound {
                atlas: atlas.to_owned(),
                name: name.to_owned(),
            });
        }

        let texture = match self.atlases.get(atlas) {
            Some(&handle) => handle,
            None => {
                let handle = self.allocate();
                self.atlases.insert(atlas.to_owned(), handle);
                handle
            }
        };
        let (width, height) = self.sprite_size;
        Ok(Sprite {
            texture,
            source: Rect::new(0.0, 0.0, width as f32, height as f32),
        })
    }

    fn release(&mut self, texture: Texture) {
        if self.live.remove(&texture.handle) {
            self.released += 1;
        } else {
            tracing::warn!(handle = texture.handle.0, "release of unknown texture");
        }
    }
}

/// Render sink that keeps every command it is given.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Commands in submission order.
    pub commands: Vec<DrawCommand>,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets recorded commands, keeping the allocation.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of recorded commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if nothing was drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl RenderSink for RecordingSink {
    fn draw(&mut self, command: &DrawCommand) {
        self.commands.push(*command);
    }
}

/// A camera that stays where it is put.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedCamera {
    /// World point at the centre of the viewport.
    pub position: Vec2,
    /// Zoom factor.
    pub zoom: f32,
    /// Viewport size in pixels.
    pub viewport: Vec2,
}

impl FixedCamera {
    /// Camera at `position`, zoom 1, 1920x1080 viewport.
    #[must_use]
    pub const fn new(position: Vec2) -> Self {
        Self {
            position,
            zoom: 1.0,
            viewport: Vec2::new(1920.0, 1080.0),
        }
    }

    /// Same camera with another viewport size, in pixels.
    #[must_use]
    pub const fn with_viewport(mut self, viewport: Vec2) -> Self {
        self.viewport = viewport;
        self
    }

    /// Same camera at another zoom.
    #[must_use]
    pub const fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }
}

impl Camera for FixedCamera {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn zoom(&self) -> f32 {
        self.zoom
    }

    fn screen_to_world(&self, point: Vec2) -> Vec2 {
        self.position + (point - self.viewport * 0.5) / self.zoom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;

    #[test]
    fn test_load_and_release_are_tracked() {
        let mut assets = HeadlessAssets::new();
        assets.set_texture_size("Planet3", 512, 256);

        let planet = assets.load_texture("Planet3").unwrap();
        let background = assets.load_texture("Background1").unwrap();
        assert_eq!((planet.width, planet.height), (512, 256));
        assert_eq!((background.width, background.height), DEFAULT_TEXTURE_SIZE);
        assert_ne!(planet.handle, background.handle);
        assert_eq!(assets.live_textures(), 2);

        assets.release(planet);
        assert_eq!(assets.live_textures(), 1);
        assert_eq!((assets.loaded(), assets.released()), (2, 1));
    }

    #[test]
    fn test_failing_names() {
        let mut assets = HeadlessAssets::new();
        assets.fail_on("Background2");
        assets.fail_on("Asteroid4");

        assert!(matches!(
            assets.load_texture("Background2"),
            Err(AssetError::AssetLoadFailure { .. })
        ));
        assert!(matches!(
            assets.sprite("AsteroidsAtlas", "Asteroid4"),
            Err(AssetError::SpriteNotFound { .. })
        ));
        assert!(assets.sprite("AsteroidsAtlas", "Asteroid1").is_ok());
        assert_eq!(assets.live_textures(), 0);
    }

    #[test]
    fn test_sprites_share_atlas_texture() {
        let mut assets = HeadlessAssets::new().with_sprite_size(32, 48);
        let a = assets.sprite("ShipsAtlas", "Miner").unwrap();
        let b = assets.sprite("ShipsAtlas", "Escort").unwrap();
        let c = assets.sprite("AsteroidsAtlas", "Asteroid1").unwrap();

        assert_eq!(a.texture, b.texture);
        assert_ne!(a.texture, c.texture);
        assert_eq!(a.origin(), Vec2::new(16.0, 24.0));
    }

    #[test]
    fn test_camera_screen_to_world() {
        let camera = FixedCamera::new(Vec2::new(1000.0, 500.0)).with_zoom(2.0);
        assert_eq!(camera.screen_to_world(Vec2::new(960.0, 540.0)), Vec2::new(1000.0, 500.0));
        assert_eq!(camera.screen_to_world(Vec2::ZERO), Vec2::new(520.0, 230.0));
    }

    #[test]
    fn test_camera_viewport_from_render_config() {
        let render = RenderConfig {
            back_buffer_width: 1280.0,
            back_buffer_height: 720.0,
            ..RenderConfig::default()
        };
        let camera = FixedCamera::new(Vec2::new(640.0, 360.0)).with_viewport(render.viewport());
        assert_eq!(camera.viewport, Vec2::new(1280.0, 720.0));
        assert_eq!(camera.screen_to_world(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_recording_sink() {
        let mut sink = RecordingSink::new();
        sink.draw(&DrawCommand::texture(TextureHandle(1), Vec2::ZERO, 1.0));
        assert_eq!(sink.len(), 1);
        sink.clear();
        assert!(sink.is_empty());
    }
}
