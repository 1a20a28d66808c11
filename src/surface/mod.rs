//! The surface: a collection of sprites in one coordinate space.
//!
//! [`Surface`] is the interface every rendering engine implements. The shared
//! bookkeeping (sprite collection, groups, gradient registry, size and view
//! box) lives in [`SurfaceBase`], which engines embed and delegate to.

pub mod config;
mod gradients;
mod sprite;

use std::collections::BTreeMap;

use enum_dispatch::enum_dispatch;

use crate::draw::GradientConfig;
use crate::errors::SurfaceError;
use crate::log::debug;
use crate::types::{BBox, ViewBox, ViewBoxShift};
use crate::vml::VmlSurface;

pub use config::SurfaceConfig;
pub use gradients::{GradientEntry, GradientRegistry};
pub use sprite::{
    Change, ChangeSet, Composed, Paint, Rotation, Scaling, Sprite, SpriteAttrs, SpriteType,
    TextAnchor, Transformation, Translation,
};

/// Operations a rendering engine exposes to the application
#[enum_dispatch]
pub trait Surface {
    /// Add a sprite; it is rendered on the next `render_item`/`render_all`
    fn add(&mut self, sprite: Sprite) -> Result<(), SurfaceError>;

    /// Remove a sprite and tear down everything rendered for it
    fn remove(&mut self, id: &str) -> Result<Sprite, SurfaceError>;

    fn sprite(&self, id: &str) -> Option<&Sprite>;

    /// Mutable access; edits go through [`Sprite::set_attributes`]
    fn sprite_mut(&mut self, id: &str) -> Result<&mut Sprite, SurfaceError>;

    /// Replace a sprite's attributes, recording what changed
    fn set_attributes(&mut self, id: &str, attrs: SpriteAttrs) -> Result<(), SurfaceError>;

    /// Bring one sprite's device element up to date
    fn render_item(&mut self, id: &str) -> Result<(), SurfaceError>;

    fn render_all(&mut self) -> Result<(), SurfaceError>;

    /// Force an attribute pass on a sprite even if nothing is pending
    fn redraw(&mut self, id: &str) -> Result<(), SurfaceError>;

    /// Bounding box in logical units, with or without the sprite transform
    fn bbox(&mut self, id: &str, with_transform: bool) -> Result<BBox, SurfaceError>;

    fn add_gradient(&mut self, gradient: &GradientConfig) -> Result<(), SurfaceError>;

    /// Resize; zero keeps the current value for that axis
    fn set_size(&mut self, width: f64, height: f64) -> Result<(), SurfaceError>;

    fn set_view_box(&mut self, view_box: ViewBox) -> Result<(), SurfaceError>;

    fn hide(&mut self) -> Result<(), SurfaceError>;

    fn show(&mut self) -> Result<(), SurfaceError>;

    /// Tear down the surface; later calls fail with [`SurfaceError::Destroyed`]
    fn destroy(&mut self);

    /// Serialized device markup; empty once destroyed
    fn markup(&self) -> Result<String, SurfaceError>;
}

/// Engine selected at construction time
#[enum_dispatch(Surface)]
#[derive(Debug)]
pub enum Engine {
    Vml(VmlSurface),
}

impl Engine {
    pub fn vml(config: SurfaceConfig) -> Self {
        Engine::Vml(VmlSurface::new(config))
    }
}

/// Engine-independent surface state
#[derive(Debug)]
pub struct SurfaceBase {
    config: SurfaceConfig,
    /// Insertion order is render order
    sprites: Vec<Sprite>,
    groups: BTreeMap<String, Vec<String>>,
    gradients: GradientRegistry,
    width: f64,
    height: f64,
    view_box: Option<ViewBox>,
    view_box_shift: Option<ViewBoxShift>,
}

impl SurfaceBase {
    pub fn new(config: SurfaceConfig) -> Self {
        let mut base = SurfaceBase {
            width: config.width,
            height: config.height,
            view_box: config.view_box,
            config,
            sprites: Vec::new(),
            groups: BTreeMap::new(),
            gradients: GradientRegistry::default(),
            view_box_shift: None,
        };
        base.update_view_box_shift();
        base
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn view_box(&self) -> Option<ViewBox> {
        self.view_box
    }

    pub fn view_box_shift(&self) -> Option<ViewBoxShift> {
        self.view_box_shift
    }

    pub fn gradients(&self) -> &GradientRegistry {
        &self.gradients
    }

    pub fn gradients_mut(&mut self) -> &mut GradientRegistry {
        &mut self.gradients
    }

    pub fn add(&mut self, sprite: Sprite) -> Result<(), SurfaceError> {
        if self.get(sprite.id()).is_some() {
            return Err(SurfaceError::DuplicateSprite {
                id: sprite.id().to_string(),
            });
        }
        self.sprites.push(sprite);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<Sprite, SurfaceError> {
        let index = self
            .sprites
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| unknown(id))?;
        for members in self.groups.values_mut() {
            members.retain(|m| m != id);
        }
        Ok(self.sprites.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Sprite> {
        self.sprites.iter_mut().find(|s| s.id() == id)
    }

    pub fn sprite(&self, id: &str) -> Result<&Sprite, SurfaceError> {
        self.get(id).ok_or_else(|| unknown(id))
    }

    pub fn sprite_mut(&mut self, id: &str) -> Result<&mut Sprite, SurfaceError> {
        self.get_mut(id).ok_or_else(|| unknown(id))
    }

    pub fn sprites(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter()
    }

    pub fn sprites_mut(&mut self) -> impl Iterator<Item = &mut Sprite> {
        self.sprites.iter_mut()
    }

    pub fn ids(&self) -> Vec<String> {
        self.sprites.iter().map(|s| s.id().to_string()).collect()
    }

    /// Add sprite `id` to each named group, once
    pub fn join_groups(&mut self, id: &str, names: &[String]) {
        for name in names {
            let members = self.groups.entry(name.clone()).or_default();
            if !members.iter().any(|m| m == id) {
                members.push(id.to_string());
            }
        }
    }

    /// Sprite ids in group `name`
    pub fn group(&self, name: &str) -> &[String] {
        self.groups.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resize; non-positive values keep the current size for that axis.
    /// Returns the resulting size.
    pub fn set_size(&mut self, width: f64, height: f64) -> (f64, f64) {
        if width > 0.0 {
            self.width = width;
        }
        if height > 0.0 {
            self.height = height;
        }
        self.update_view_box_shift();
        (self.width, self.height)
    }

    pub fn set_view_box(&mut self, view_box: ViewBox) {
        self.view_box = Some(view_box);
        self.update_view_box_shift();
    }

    fn update_view_box_shift(&mut self) {
        self.view_box_shift = self
            .view_box
            .and_then(|vb| ViewBoxShift::fit(&vb, self.width, self.height));
        debug!(shift = ?self.view_box_shift, "view box shift updated");
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
        self.groups.clear();
        self.gradients.clear();
    }
}

fn unknown(id: &str) -> SurfaceError {
    SurfaceError::UnknownSprite { id: id.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut base = SurfaceBase::new(SurfaceConfig::default());
        base.add(Sprite::new("a", SpriteType::Rect)).unwrap();
        assert!(matches!(
            base.add(Sprite::new("a", SpriteType::Circle)),
            Err(SurfaceError::DuplicateSprite { .. })
        ));
    }

    #[test]
    fn remove_leaves_groups() {
        let mut base = SurfaceBase::new(SurfaceConfig::default());
        base.add(Sprite::new("a", SpriteType::Rect)).unwrap();
        base.add(Sprite::new("b", SpriteType::Rect)).unwrap();
        base.join_groups("a", &["bars".to_string()]);
        base.join_groups("b", &["bars".to_string()]);
        base.join_groups("a", &["bars".to_string()]);
        assert_eq!(base.group("bars"), ["a", "b"]);

        base.remove("a").unwrap();
        assert_eq!(base.group("bars"), ["b"]);
        assert!(matches!(base.remove("a"), Err(SurfaceError::UnknownSprite { .. })));
        assert_eq!(base.ids(), vec!["b".to_string()]);
    }

    #[test]
    fn zero_size_keeps_previous() {
        let mut base = SurfaceBase::new(SurfaceConfig::default().with_size(300.0, 200.0));
        assert_eq!(base.set_size(0.0, 150.0), (300.0, 150.0));
    }

    #[test]
    fn view_box_shift_tracks_size() {
        let vb = ViewBox {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
        };
        let mut base =
            SurfaceBase::new(SurfaceConfig::default().with_size(100.0, 100.0).with_view_box(vb));
        assert_eq!(base.view_box_shift().map(|s| s.scale), Some(1.0));
        base.set_size(200.0, 200.0);
        assert_eq!(base.view_box_shift().map(|s| s.scale), Some(2.0));
    }
}
