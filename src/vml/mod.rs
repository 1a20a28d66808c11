//! The VML engine.
//!
//! [`VmlSurface`] keeps a retained element tree in step with its sprites. A
//! render pass only touches what a sprite's pending changes say is stale:
//!
//! 1. `create_sprite_element` builds the element the first time a sprite is
//!    rendered (shape or image, plus a skew child and, for text, a text path
//!    on a one-unit rail);
//! 2. `apply_attrs` runs the attribute steps in a fixed order, each consuming
//!    the change it is responsible for;
//! 3. `apply_transformations` folds translation, scaling and rotation into
//!    one matrix and writes it to the element.
//!
//! Coordinates are logical everywhere except in the emitted markup, which is
//! scaled by [`ZOOM`](crate::surface::config::ZOOM).

mod dom;
pub mod markup;
mod paint;
mod path;
mod state;
mod text;
mod transform;

use std::collections::HashMap;

use crate::draw::{Path, fmt_num, map_path, path_dimensions, path_to_absolute};
use crate::errors::SurfaceError;
use crate::log::debug;
use crate::matrix::Matrix;
use crate::surface::config::{ZOOM, apply_min_defaults};
use crate::surface::{Change, Sprite, SpriteAttrs, SpriteType, Surface, SurfaceBase, SurfaceConfig};
use crate::types::{BBox, ViewBox};
use state::{RenderState, child_node};

pub use dom::{Node, NodeId, Tag, VmlDocument, vml_bool};
pub use markup::VmlNode;
pub use path::{PathSource, absolute_to_vml, ellipse_to_vml, path_to_vml};
pub use state::{Handles, TextMetrics};
pub use text::{FontSpec, ProportionalMeasurer, TextMeasurer, html_decode};

/// A surface rendered to VML
#[derive(Debug)]
pub struct VmlSurface {
    base: SurfaceBase,
    doc: VmlDocument,
    /// `None` once destroyed
    root: Option<NodeId>,
    states: HashMap<String, RenderState>,
    measurer: Box<dyn TextMeasurer>,
    /// Lowest z-index seen; element z-indices are offset by it so they stay
    /// non-negative
    z_index_shift: i32,
}

/// Element z-index for `z_index` under `shift`; widened so extreme values
/// cannot overflow
fn stacking_order(z_index: i32, shift: i32) -> i64 {
    i64::from(z_index) - i64::from(shift)
}

fn unknown(id: &str) -> SurfaceError {
    SurfaceError::UnknownSprite { id: id.to_string() }
}

impl VmlSurface {
    pub fn new(config: SurfaceConfig) -> Self {
        Self::with_measurer(config, Box::new(ProportionalMeasurer))
    }

    /// A surface that measures text with `measurer`
    pub fn with_measurer(config: SurfaceConfig, measurer: Box<dyn TextMeasurer>) -> Self {
        let base = SurfaceBase::new(config);
        let mut doc = VmlDocument::new();
        let root = doc.create(Tag::Div);
        doc.add_class(root, &base.config().base_class());
        let mut surface = VmlSurface {
            base,
            doc,
            root: Some(root),
            states: HashMap::new(),
            measurer,
            z_index_shift: 0,
        };
        surface.size_root();
        surface
    }

    pub fn base(&self) -> &SurfaceBase {
        &self.base
    }

    pub fn document(&self) -> &VmlDocument {
        &self.doc
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn z_index_shift(&self) -> i32 {
        self.z_index_shift
    }

    /// Nodes rendered for sprite `id`, if it has been rendered
    pub fn handles(&self, id: &str) -> Option<Handles> {
        self.states.get(id).map(|s| s.handles)
    }

    /// Sprite matrix from the last transform pass, without the view-box shift
    pub fn sprite_matrix(&self, id: &str) -> Option<Matrix> {
        self.states.get(id).map(|s| s.matrix)
    }

    /// Net rotation in degrees from the last transform pass
    pub fn net_rotation(&self, id: &str) -> Option<f64> {
        self.states.get(id).map(|s| s.rotation)
    }

    fn alive(&self) -> Result<NodeId, SurfaceError> {
        self.root.ok_or(SurfaceError::Destroyed)
    }

    fn state_mut(&mut self, id: &str) -> Result<&mut RenderState, SurfaceError> {
        self.states.get_mut(id).ok_or_else(|| unknown(id))
    }

    fn size_root(&mut self) {
        let Some(root) = self.root else {
            return;
        };
        for (prop, value) in [("width", self.base.width()), ("height", self.base.height())] {
            if value > 0.0 {
                self.doc.set_style(root, prop, format!("{}px", fmt_num(value)));
            }
        }
    }

    /// Build the element for sprite `id` and attach it to the root.
    ///
    /// Does nothing if the element already exists.
    pub fn create_sprite_element(&mut self, id: &str) -> Result<NodeId, SurfaceError> {
        let root = self.alive()?;
        if let Some(state) = self.states.get(id) {
            return Ok(state.handles.element);
        }
        let kind = self.base.sprite(id)?.kind();
        let doc = &mut self.doc;

        let element = doc.create(match kind {
            SpriteType::Image => Tag::Image,
            _ => Tag::Shape,
        });
        doc.set_attr(element, "id", id);
        doc.set_attr(element, "coordsize", format!("{} {}", ZOOM, ZOOM));
        doc.set_attr(element, "coordorigin", "0 0");
        doc.add_class(element, &self.base.config().sprite_class());
        doc.set_style(element, "z-index", stacking_order(0, self.z_index_shift).to_string());

        let mut state = RenderState::new(element);
        if kind == SpriteType::Text {
            let textpath = child_node(doc, &mut state.handles.textpath, element, Tag::TextPath);
            doc.set_bool(textpath, "on", true);
            let rail = child_node(doc, &mut state.handles.path, element, Tag::Path);
            doc.set_bool(rail, "textpathok", true);
        }
        if kind != SpriteType::Image {
            let skew = child_node(doc, &mut state.handles.skew, element, Tag::Skew);
            doc.set_bool(skew, "on", true);
        }
        doc.append_child(root, element);

        self.states.insert(id.to_string(), state);
        debug!(id, kind = kind.name(), "created sprite element");
        Ok(element)
    }

    /// Run the attribute pass for sprite `id`, consuming every change except
    /// [`Change::Transform`]
    pub fn apply_attrs(&mut self, id: &str) -> Result<(), SurfaceError> {
        self.create_sprite_element(id)?;

        let sprite = self.base.sprite_mut(id)?;
        let kind = sprite.kind();
        let groups = sprite.take_group();
        if !groups.is_empty() {
            self.base.join_groups(id, &groups);
        }

        let sprite = self.base.sprite_mut(id)?;
        let mut attrs = sprite.attrs().clone();
        apply_min_defaults(kind, &mut attrs);
        let z_index_changed = sprite.take_change(Change::ZIndex);
        let hidden_changed = sprite.take_change(Change::Hidden);
        let path_changed = sprite.take_change(Change::Path);
        let font_changed = sprite.take_change(Change::Font);
        if z_index_changed {
            self.set_z_index(id, attrs.z_index);
        }

        let element = self.state_mut(id)?.handles.element;
        let doc = &mut self.doc;

        if kind == SpriteType::Image {
            for (prop, value) in [("width", attrs.width), ("height", attrs.height)] {
                doc.set_style(element, prop, format!("{}px", fmt_num(value.unwrap_or(0.0))));
            }
            if let Some(src) = &attrs.src {
                doc.set_attr(element, "src", src.clone());
            }
        }

        let tag = doc.get(element).map(Node::tag).unwrap_or(Tag::Shape);
        for (name, value) in [
            ("href", &attrs.href),
            ("title", &attrs.title),
            ("target", &attrs.target),
            ("cursor", &attrs.cursor),
        ] {
            if !tag.has_slot(name) {
                continue;
            }
            match value {
                Some(v) => doc.set_attr(element, name, v.clone()),
                None => doc.remove_attr(element, name),
            }
        }

        if hidden_changed {
            let class = self.base.config().hidden_class();
            if attrs.hidden {
                doc.add_class(element, &class);
            } else {
                doc.remove_class(element, &class);
            }
        }

        if path_changed {
            self.set_path(id, kind, &attrs)?;
        }

        self.set_clip(id, attrs.clip_rect.as_deref());

        if kind == SpriteType::Text {
            let state = self.states.get_mut(id).ok_or_else(|| unknown(id))?;
            text::set_text_attributes(
                &mut self.doc,
                state,
                &attrs,
                font_changed,
                self.measurer.as_ref(),
            );
            self.base.sprite_mut(id)?.invalidate_bbox();
        }

        let state = self.states.get_mut(id).ok_or_else(|| unknown(id))?;
        if attrs.opacity.is_some() || attrs.stroke_opacity.is_some() || attrs.fill.is_some() {
            paint::set_fill(&mut self.doc, state, &attrs, self.base.gradients());
        }
        if attrs.stroke.is_some() || attrs.stroke_opacity.is_some() || attrs.fill.is_some() {
            paint::set_stroke(&mut self.doc, state, &attrs);
        }

        for (prop, value) in &attrs.style {
            self.doc.set_style(element, prop, value.clone());
        }

        self.base.sprite_mut(id)?.take_change(Change::Attrs);
        debug!(id, "applied attributes");
        Ok(())
    }

    fn set_path(&mut self, id: &str, kind: SpriteType, attrs: &SpriteAttrs) -> Result<(), SurfaceError> {
        let element = self.state_mut(id)?.handles.element;
        let native = match kind {
            SpriteType::Circle | SpriteType::Ellipse => {
                let rx = attrs.rx.or(attrs.radius).unwrap_or(0.0);
                let ry = attrs.ry.or(attrs.radius).unwrap_or(0.0);
                ellipse_to_vml(attrs.x.unwrap_or(0.0), attrs.y.unwrap_or(0.0), rx, ry)
            }
            SpriteType::Rect | SpriteType::Path => {
                let sprite = self.base.sprite_mut(id)?;
                let absolute: Path = path_to_absolute(&sprite.shape_path().unwrap_or_default()).into();
                let native = path_to_vml(PathSource::Commands(&absolute))?;
                sprite.write_back_path(absolute);
                native
            }
            // Text draws along its rail and images have no outline
            SpriteType::Text | SpriteType::Image => return Ok(()),
        };
        self.doc.set_attr(element, "path", native);
        Ok(())
    }

    /// Position sprite `id` in the stacking order, restacking every rendered
    /// sprite if `z_index` falls below the current shift
    fn set_z_index(&mut self, id: &str, z_index: i32) {
        if z_index >= self.z_index_shift {
            if let Some(state) = self.states.get(id) {
                let element = state.handles.element;
                self.doc.set_style(
                    element,
                    "z-index",
                    stacking_order(z_index, self.z_index_shift).to_string(),
                );
            }
            return;
        }

        let shift = self
            .base
            .sprites()
            .map(|s| s.attrs().z_index)
            .fold(z_index, i32::min);
        debug!(from = self.z_index_shift, to = shift, "z-index shift lowered, restacking");
        self.z_index_shift = shift;
        for sprite in self.base.sprites_mut() {
            let Some(state) = self.states.get(sprite.id()) else {
                continue;
            };
            self.doc.set_style(
                state.handles.element,
                "z-index",
                stacking_order(sprite.attrs().z_index, shift).to_string(),
            );
            sprite.take_change(Change::ZIndex);
        }
    }

    /// Wrap the element in a clipping div, or clear the clip unless `rect`
    /// has exactly four components
    fn set_clip(&mut self, id: &str, rect: Option<&[f64]>) {
        let Some(root) = self.root else {
            return;
        };
        let (width, height) = (self.base.width(), self.base.height());
        let Some(state) = self.states.get_mut(id) else {
            return;
        };
        let element = state.handles.element;
        let doc = &mut self.doc;

        let Some(&[x, y, w, h]) = rect else {
            if let Some(clip) = state.handles.clip {
                doc.set_style(clip, "clip", "");
            }
            return;
        };

        let clip = match state.handles.clip {
            Some(clip) => clip,
            None => {
                let clip = doc.create(Tag::Div);
                doc.insert_before(root, clip, element);
                doc.append_child(clip, element);
                doc.set_style(clip, "position", "absolute");
                doc.set_style(clip, "left", "0");
                doc.set_style(clip, "top", "0");
                state.handles.clip = Some(clip);
                clip
            }
        };
        doc.set_style(clip, "width", format!("{}px", fmt_num(width)));
        doc.set_style(clip, "height", format!("{}px", fmt_num(height)));
        doc.set_style(
            clip,
            "clip",
            format!(
                "rect({}px {}px {}px {}px)",
                fmt_num(y),
                fmt_num(x + w),
                fmt_num(y + h),
                fmt_num(x)
            ),
        );
    }

    /// Rebuild sprite `id`'s transform. With `matrix_only` the matrix is
    /// recomputed but not written to the element.
    pub fn apply_transformations(&mut self, id: &str, matrix_only: bool) -> Result<(), SurfaceError> {
        self.create_sprite_element(id)?;
        let plain = self.plain_bbox(id)?;

        let sprite = self.base.sprite_mut(id)?;
        sprite.update_transformations(plain);
        let composed = sprite.compose_transformations();
        sprite.invalidate_transform_bbox();

        let shift = self.base.view_box_shift();
        let state = self.states.get_mut(id).ok_or_else(|| unknown(id))?;
        state.matrix = composed.matrix;
        state.rotation = composed.rotation;
        state.scale = composed.scale;
        if matrix_only {
            return Ok(());
        }

        let device = transform::device_matrix(&composed.matrix, shift);
        transform::emit(&mut self.doc, state, &device, plain);
        debug!(id, matrix = %device, "applied transformations");
        Ok(())
    }

    /// Untransformed box of sprite `id`. Text is rendered first if its
    /// measurement is stale.
    fn plain_bbox(&mut self, id: &str) -> Result<BBox, SurfaceError> {
        let sprite = self.base.sprite(id)?;
        let kind = sprite.kind();
        if kind == SpriteType::Text && (sprite.is_dirty() || !self.states.contains_key(id)) {
            self.render_item(id)?;
        }

        let sprite = self.base.sprite(id)?;
        if let Some(bbox) = sprite.cached_bbox(false) {
            return Ok(bbox);
        }
        let bbox = match kind {
            SpriteType::Text => self.bbox_text(id)?,
            _ => sprite.shape_bbox().unwrap_or_default(),
        };
        self.base.sprite_mut(id)?.cache_bbox(false, bbox);
        Ok(bbox)
    }

    /// Box of a rendered text sprite, shifted by its anchor correction
    pub fn bbox_text(&self, id: &str) -> Result<BBox, SurfaceError> {
        self.alive()?;
        self.states
            .get(id)
            .map(|s| s.metrics.bbox())
            .ok_or_else(|| unknown(id))
    }

    /// Last measured text box of sprite `id`
    pub fn text_metrics(&self, id: &str) -> Option<TextMetrics> {
        self.states.get(id).map(|s| s.metrics)
    }

    fn retransform_all(&mut self) -> Result<(), SurfaceError> {
        let rendered: Vec<String> = self
            .base
            .ids()
            .into_iter()
            .filter(|id| self.states.contains_key(id))
            .collect();
        for id in rendered {
            self.apply_transformations(&id, false)?;
        }
        Ok(())
    }
}

impl Surface for VmlSurface {
    fn add(&mut self, sprite: Sprite) -> Result<(), SurfaceError> {
        self.alive()?;
        self.base.add(sprite)
    }

    fn remove(&mut self, id: &str) -> Result<Sprite, SurfaceError> {
        self.alive()?;
        let sprite = self.base.remove(id)?;
        if let Some(state) = self.states.remove(id) {
            state.teardown(&mut self.doc);
        }
        debug!(id, "removed sprite");
        Ok(sprite)
    }

    fn sprite(&self, id: &str) -> Option<&Sprite> {
        self.base.get(id)
    }

    fn sprite_mut(&mut self, id: &str) -> Result<&mut Sprite, SurfaceError> {
        self.alive()?;
        self.base.sprite_mut(id)
    }

    fn set_attributes(&mut self, id: &str, attrs: SpriteAttrs) -> Result<(), SurfaceError> {
        self.sprite_mut(id)?.replace_attributes(attrs);
        Ok(())
    }

    fn render_item(&mut self, id: &str) -> Result<(), SurfaceError> {
        self.create_sprite_element(id)?;
        let changes = self.base.sprite(id)?.changes();
        if changes.is_empty() {
            return Ok(());
        }
        debug!(id, ?changes, "rendering sprite");
        self.apply_attrs(id)?;
        if self.base.sprite_mut(id)?.take_change(Change::Transform) {
            self.apply_transformations(id, false)?;
        }
        Ok(())
    }

    fn render_all(&mut self) -> Result<(), SurfaceError> {
        self.alive()?;
        for id in self.base.ids() {
            self.render_item(&id)?;
        }
        Ok(())
    }

    fn redraw(&mut self, id: &str) -> Result<(), SurfaceError> {
        self.sprite_mut(id)?.mark(Change::Attrs);
        self.render_item(id)
    }

    fn bbox(&mut self, id: &str, with_transform: bool) -> Result<BBox, SurfaceError> {
        self.alive()?;
        let plain = self.plain_bbox(id)?;
        if !with_transform {
            return Ok(plain);
        }

        let sprite = self.base.sprite_mut(id)?;
        if let Some(bbox) = sprite.cached_bbox(true) {
            return Ok(bbox);
        }
        sprite.update_transformations(plain);
        let matrix = sprite.compose_transformations().matrix;
        let bbox = match sprite.shape_path() {
            Some(path) => path_dimensions(&map_path(&path_to_absolute(&path), &matrix)),
            None => BBox::from_points(plain.corners().map(|c| matrix.transform_point(c))),
        };
        sprite.cache_bbox(true, bbox);
        Ok(bbox)
    }

    fn add_gradient(&mut self, gradient: &crate::draw::GradientConfig) -> Result<(), SurfaceError> {
        self.alive()?;
        self.base.gradients_mut().register(gradient);
        debug!(id = %gradient.id, stops = gradient.stops.len(), "registered gradient");
        Ok(())
    }

    fn set_size(&mut self, width: f64, height: f64) -> Result<(), SurfaceError> {
        self.alive()?;
        let (width, height) = self.base.set_size(width, height);
        self.size_root();
        for state in self.states.values() {
            if let Some(clip) = state.handles.clip {
                self.doc.set_style(clip, "width", format!("{}px", fmt_num(width)));
                self.doc.set_style(clip, "height", format!("{}px", fmt_num(height)));
            }
        }
        self.retransform_all()
    }

    fn set_view_box(&mut self, view_box: ViewBox) -> Result<(), SurfaceError> {
        self.alive()?;
        self.base.set_view_box(view_box);
        self.retransform_all()
    }

    fn hide(&mut self) -> Result<(), SurfaceError> {
        let root = self.alive()?;
        self.doc.set_style(root, "display", "none");
        Ok(())
    }

    fn show(&mut self) -> Result<(), SurfaceError> {
        let root = self.alive()?;
        self.doc.set_style(root, "display", "");
        Ok(())
    }

    fn destroy(&mut self) {
        let Some(root) = self.root.take() else {
            return;
        };
        for (_, state) in self.states.drain() {
            state.teardown(&mut self.doc);
        }
        self.doc.remove(root);
        self.base.clear();
        debug!("surface destroyed");
    }

    fn markup(&self) -> Result<String, SurfaceError> {
        match self.root {
            Some(root) => self.doc.to_markup(root),
            None => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Rotation, Translation};

    fn surface() -> VmlSurface {
        VmlSurface::new(SurfaceConfig::default().with_size(400.0, 300.0))
    }

    #[test]
    fn element_skeleton() {
        let mut s = surface();
        s.add(Sprite::new("t", SpriteType::Text)).unwrap();
        s.add(Sprite::new("i", SpriteType::Image)).unwrap();
        s.render_all().unwrap();

        let text = s.handles("t").unwrap();
        let children = s.document().children(text.element);
        assert_eq!(
            children,
            [text.textpath.unwrap(), text.path.unwrap(), text.skew.unwrap(), text.fill.unwrap(), text.stroke.unwrap()]
        );
        assert_eq!(s.document().attr(text.element, "coordsize"), Some("21600 21600"));
        assert!(s.document().has_class(text.element, "x-vml-sprite"));

        let image = s.handles("i").unwrap();
        assert!(image.skew.is_none());
        assert_eq!(s.document().get(image.element).map(Node::tag), Some(Tag::Image));
    }

    #[test]
    fn render_consumes_every_change() {
        let mut s = surface();
        s.add(Sprite::new("r", SpriteType::Rect).with(|a| {
            a.width = Some(10.0);
            a.height = Some(10.0);
            a.rotation = Some(Rotation {
                degrees: 30.0,
                ..Default::default()
            });
        }))
        .unwrap();
        s.render_item("r").unwrap();
        assert!(!s.sprite("r").unwrap().is_dirty());
        assert_eq!(s.net_rotation("r"), Some(30.0));
    }

    #[test]
    fn slots_follow_the_element() {
        let mut s = surface();
        s.add(Sprite::new("r", SpriteType::Rect).with(|a| {
            a.href = Some("https://example.com".into());
            a.cursor = Some("pointer".into());
        }))
        .unwrap();
        s.add(Sprite::new("i", SpriteType::Image).with(|a| {
            a.href = Some("https://example.com".into());
            a.title = Some("logo".into());
        }))
        .unwrap();
        s.render_all().unwrap();

        let doc = s.document();
        let rect = s.handles("r").unwrap().element;
        assert_eq!(doc.attr(rect, "href"), Some("https://example.com"));
        assert_eq!(doc.attr(rect, "cursor"), Some("pointer"));
        let image = s.handles("i").unwrap().element;
        assert_eq!(doc.attr(image, "href"), None);
        assert_eq!(doc.attr(image, "title"), Some("logo"));
    }

    #[test]
    fn z_index_rescan() {
        let mut s = surface();
        for (id, z) in [("a", 0), ("b", 3)] {
            s.add(Sprite::new(id, SpriteType::Rect).with(|a| a.z_index = z))
                .unwrap();
        }
        s.render_all().unwrap();
        let b = s.handles("b").unwrap().element;
        assert_eq!(s.document().style(b, "z-index"), Some("3"));

        s.add(Sprite::new("c", SpriteType::Rect).with(|a| a.z_index = -2))
            .unwrap();
        s.render_item("c").unwrap();
        assert_eq!(s.z_index_shift(), -2);
        let doc = s.document();
        assert_eq!(doc.style(s.handles("a").unwrap().element, "z-index"), Some("2"));
        assert_eq!(doc.style(b, "z-index"), Some("5"));
        assert_eq!(doc.style(s.handles("c").unwrap().element, "z-index"), Some("0"));
    }

    #[test]
    fn extreme_z_indices_do_not_overflow() {
        let mut s = surface();
        s.add(Sprite::new("top", SpriteType::Rect).with(|a| a.z_index = i32::MAX))
            .unwrap();
        s.render_all().unwrap();
        let top = s.handles("top").unwrap().element;
        assert_eq!(s.document().style(top, "z-index"), Some("2147483647"));

        s.add(Sprite::new("low", SpriteType::Rect).with(|a| a.z_index = -1))
            .unwrap();
        s.render_item("low").unwrap();
        assert_eq!(s.document().style(top, "z-index"), Some("2147483648"));

        s.add(Sprite::new("bottom", SpriteType::Rect).with(|a| a.z_index = i32::MIN))
            .unwrap();
        s.render_item("bottom").unwrap();
        assert_eq!(s.z_index_shift(), i32::MIN);
        let doc = s.document();
        assert_eq!(doc.style(top, "z-index"), Some("4294967295"));
        assert_eq!(doc.style(s.handles("low").unwrap().element, "z-index"), Some("2147483647"));
        assert_eq!(doc.style(s.handles("bottom").unwrap().element, "z-index"), Some("0"));
    }

    #[test]
    fn clip_wraps_and_clears() {
        let mut s = surface();
        s.add(Sprite::new("r", SpriteType::Rect).with(|a| a.clip_rect = Some(vec![10.0, 20.0, 30.0, 40.0])))
            .unwrap();
        s.render_item("r").unwrap();
        let h = s.handles("r").unwrap();
        let clip = h.clip.unwrap();
        let doc = s.document();
        assert_eq!(doc.style(clip, "clip"), Some("rect(20px 40px 60px 10px)"));
        assert_eq!(doc.style(clip, "width"), Some("400px"));
        assert_eq!(doc.children(s.root().unwrap()), [clip]);
        assert_eq!(doc.children(clip), [h.element]);

        s.sprite_mut("r")
            .unwrap()
            .set_attributes(|a| a.clip_rect = Some(vec![1.0, 2.0]));
        s.render_item("r").unwrap();
        assert_eq!(s.document().style(clip, "clip"), None);

        s.set_size(800.0, 0.0).unwrap();
        assert_eq!(s.document().style(clip, "width"), Some("800px"));
        assert_eq!(s.document().style(clip, "height"), Some("300px"));
    }

    #[test]
    fn text_bbox_renders_on_demand() {
        let mut s = surface();
        s.add(Sprite::new("t", SpriteType::Text).with(|a| {
            a.x = Some(50.0);
            a.y = Some(50.0);
            a.text = Some("Hello".into());
            a.text_anchor = Some(crate::surface::TextAnchor::Middle);
        }))
        .unwrap();
        let bbox = s.bbox("t", false).unwrap();
        assert!(!s.sprite("t").unwrap().is_dirty());
        assert!(bbox.width > 0.0);
        assert_eq!(bbox.x, 50.0 - bbox.width / 2.0);
        assert_eq!(bbox, s.bbox_text("t").unwrap());
    }

    #[test]
    fn transformed_bbox_follows_translation() {
        let mut s = surface();
        s.add(Sprite::new("r", SpriteType::Rect).with(|a| {
            a.width = Some(10.0);
            a.height = Some(20.0);
            a.translation = Some(Translation { x: 5.0, y: 5.0 });
        }))
        .unwrap();
        assert_eq!(s.bbox("r", false).unwrap(), BBox::new(0.0, 0.0, 10.0, 20.0));
        assert_eq!(s.bbox("r", true).unwrap(), BBox::new(5.0, 5.0, 10.0, 20.0));

        s.sprite_mut("r")
            .unwrap()
            .set_attributes(|a| a.translation = Some(Translation { x: 0.0, y: 1.0 }));
        assert_eq!(s.bbox("r", true).unwrap(), BBox::new(0.0, 1.0, 10.0, 20.0));
    }

    #[test]
    fn destroyed_surface_refuses_work() {
        let mut s = surface();
        s.add(Sprite::new("r", SpriteType::Rect)).unwrap();
        s.render_all().unwrap();
        s.destroy();
        assert_eq!(s.markup().unwrap(), "");
        assert!(s.document().is_empty());
        assert!(matches!(s.render_all(), Err(SurfaceError::Destroyed)));
        assert!(matches!(
            s.add(Sprite::new("q", SpriteType::Rect)),
            Err(SurfaceError::Destroyed)
        ));
        s.destroy();
    }
}
