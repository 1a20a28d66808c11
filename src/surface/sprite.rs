//! Sprites: one drawable with its attributes and pending changes.
//!
//! Attributes are only changed through [`Sprite::set_attributes`], which diffs
//! the old and new values and records a [`ChangeSet`]. Each change kind is
//! consumed by exactly one render step.

use std::fmt;

use glam::{DVec2, dvec2};

use crate::draw::{Path, ellipse_path, path_to_absolute, rect_path};
use crate::matrix::Matrix;
use crate::types::BBox;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteType {
    Circle,
    Ellipse,
    Rect,
    Path,
    Text,
    Image,
}

impl SpriteType {
    pub fn name(self) -> &'static str {
        match self {
            SpriteType::Circle => "circle",
            SpriteType::Ellipse => "ellipse",
            SpriteType::Rect => "rect",
            SpriteType::Path => "path",
            SpriteType::Text => "text",
            SpriteType::Image => "image",
        }
    }
}

/// A fill or stroke value. Lists are accepted and only their first entry is used.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    One(String),
    Many(Vec<String>),
}

impl Paint {
    pub fn first(&self) -> Option<&str> {
        match self {
            Paint::One(s) => Some(s),
            Paint::Many(list) => list.first().map(String::as_str),
        }
    }
}

impl From<&str> for Paint {
    fn from(value: &str) -> Self {
        Paint::One(value.to_string())
    }
}

impl From<String> for Paint {
    fn from(value: String) -> Self {
        Paint::One(value)
    }
}

impl From<Vec<String>> for Paint {
    fn from(value: Vec<String>) -> Self {
        Paint::Many(value)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

/// Rotation in degrees; the center defaults to the middle of the plain bbox
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation {
    pub degrees: f64,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// Scale factors; the center defaults to the middle of the plain bbox
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scaling {
    pub x: f64,
    pub y: f64,
    pub cx: Option<f64>,
    pub cy: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Translation {
    pub x: f64,
    pub y: f64,
}

/// The attribute dictionary of a sprite.
///
/// Lengths are in logical units. `radius` is the circle radius or the rect
/// corner radius.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpriteAttrs {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub radius: Option<f64>,
    pub rx: Option<f64>,
    pub ry: Option<f64>,
    pub path: Option<Path>,
    pub src: Option<String>,

    pub text: Option<String>,
    pub font: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<String>,
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
    pub text_anchor: Option<TextAnchor>,

    pub fill: Option<Paint>,
    pub stroke: Option<Paint>,
    pub opacity: Option<f64>,
    pub fill_opacity: Option<f64>,
    pub stroke_opacity: Option<f64>,
    pub stroke_width: Option<f64>,
    pub stroke_dasharray: Option<String>,
    pub stroke_linejoin: Option<String>,
    pub stroke_linecap: Option<String>,
    pub stroke_miterlimit: Option<f64>,

    /// `[x, y, width, height]`; any other length clears the clip
    pub clip_rect: Option<Vec<f64>>,
    pub hidden: bool,
    pub href: Option<String>,
    pub title: Option<String>,
    pub target: Option<String>,
    pub cursor: Option<String>,

    pub rotation: Option<Rotation>,
    pub scaling: Option<Scaling>,
    pub translation: Option<Translation>,
    pub z_index: i32,

    /// Groups to join on the next render; consumed once
    pub group: Vec<String>,
    /// Inline style applied after everything else
    pub style: Vec<(String, String)>,
}

/// A kind of pending change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change {
    /// Something changed; the attribute pass must run
    Attrs,
    Path,
    Hidden,
    Font,
    Transform,
    ZIndex,
}

impl Change {
    pub const ALL: [Change; 6] = [
        Change::Attrs,
        Change::Path,
        Change::Hidden,
        Change::Font,
        Change::Transform,
        Change::ZIndex,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of pending changes, one bit per [`Change`]
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSet {
    bits: u8,
}

impl ChangeSet {
    pub const fn empty() -> Self {
        ChangeSet { bits: 0 }
    }

    pub fn all() -> Self {
        Change::ALL.into_iter().collect()
    }

    pub fn insert(&mut self, change: Change) {
        self.bits |= change.bit();
    }

    pub fn contains(self, change: Change) -> bool {
        self.bits & change.bit() != 0
    }

    /// Clear `change`, returning whether it was pending
    pub fn take(&mut self, change: Change) -> bool {
        let pending = self.contains(change);
        self.bits &= !change.bit();
        pending
    }

    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Change> {
        Change::ALL.into_iter().filter(move |c| self.contains(*c))
    }

    pub fn union(self, other: ChangeSet) -> ChangeSet {
        ChangeSet {
            bits: self.bits | other.bits,
        }
    }

    /// Changes implied by going from `old` to `new`
    pub fn diff(old: &SpriteAttrs, new: &SpriteAttrs) -> ChangeSet {
        let mut set = ChangeSet::empty();
        if old == new {
            return set;
        }
        set.insert(Change::Attrs);

        let path_changed = old.x != new.x
            || old.y != new.y
            || old.width != new.width
            || old.height != new.height
            || old.radius != new.radius
            || old.rx != new.rx
            || old.ry != new.ry
            || old.path != new.path;
        if path_changed {
            set.insert(Change::Path);
            if new.rotation.is_some() || new.scaling.is_some() {
                set.insert(Change::Transform);
            }
        }
        if old.hidden != new.hidden {
            set.insert(Change::Hidden);
        }
        if old.text != new.text
            || old.font != new.font
            || old.font_family != new.font_family
            || old.font_size != new.font_size
            || old.font_weight != new.font_weight
            || old.font_style != new.font_style
            || old.text_anchor != new.text_anchor
        {
            set.insert(Change::Font);
        }
        if old.rotation != new.rotation
            || old.scaling != new.scaling
            || old.translation != new.translation
        {
            set.insert(Change::Transform);
        }
        if old.z_index != new.z_index {
            set.insert(Change::ZIndex);
        }
        set
    }
}

impl FromIterator<Change> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = Change>>(iter: I) -> Self {
        let mut set = ChangeSet::empty();
        for c in iter {
            set.insert(c);
        }
        set
    }
}

impl fmt::Debug for ChangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// One step of a sprite's transform, in application order
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transformation {
    Translate { x: f64, y: f64 },
    Scale { x: f64, y: f64, center: DVec2 },
    Rotate { degrees: f64, center: DVec2 },
}

/// Transformations folded into one matrix
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Composed {
    pub matrix: Matrix,
    /// Sum of all rotations, in degrees
    pub rotation: f64,
    /// Product of all scale factors
    pub scale: DVec2,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct BBoxCache {
    plain: Option<BBox>,
    transform: Option<BBox>,
}

#[derive(Clone, Debug)]
pub struct Sprite {
    id: String,
    kind: SpriteType,
    attrs: SpriteAttrs,
    changes: ChangeSet,
    bbox: BBoxCache,
    transformations: Vec<Transformation>,
}

impl Sprite {
    /// A new sprite; every change starts out pending
    pub fn new(id: impl Into<String>, kind: SpriteType) -> Self {
        Sprite {
            id: id.into(),
            kind,
            attrs: SpriteAttrs::default(),
            changes: ChangeSet::all(),
            bbox: BBoxCache::default(),
            transformations: Vec::new(),
        }
    }

    /// Builder form of [`Sprite::set_attributes`]
    pub fn with(mut self, f: impl FnOnce(&mut SpriteAttrs)) -> Self {
        self.set_attributes(f);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> SpriteType {
        self.kind
    }

    pub fn attrs(&self) -> &SpriteAttrs {
        &self.attrs
    }

    pub fn changes(&self) -> ChangeSet {
        self.changes
    }

    pub fn is_dirty(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn transformations(&self) -> &[Transformation] {
        &self.transformations
    }

    /// Edit attributes and record what changed
    pub fn set_attributes(&mut self, f: impl FnOnce(&mut SpriteAttrs)) {
        let old = self.attrs.clone();
        f(&mut self.attrs);
        self.keep_derived_path(&old);
        self.record(ChangeSet::diff(&old, &self.attrs));
    }

    /// Replace every attribute at once
    pub fn replace_attributes(&mut self, attrs: SpriteAttrs) {
        let old = std::mem::replace(&mut self.attrs, attrs);
        self.keep_derived_path(&old);
        self.record(ChangeSet::diff(&old, &self.attrs));
    }

    /// Only path sprites take `path` as input. For every other type it holds
    /// the written-back outline, which edits must not clear or replace.
    fn keep_derived_path(&mut self, old: &SpriteAttrs) {
        if self.kind != SpriteType::Path {
            self.attrs.path.clone_from(&old.path);
        }
    }

    fn record(&mut self, changes: ChangeSet) {
        if changes.contains(Change::Path) || changes.contains(Change::Transform) {
            self.invalidate_bbox();
        }
        self.changes = self.changes.union(changes);
    }

    /// Flag `change` as pending, plus the generic attribute pass
    pub fn mark(&mut self, change: Change) {
        self.changes.insert(Change::Attrs);
        self.changes.insert(change);
    }

    pub(crate) fn take_change(&mut self, change: Change) -> bool {
        self.changes.take(change)
    }

    /// Store a computed path without flagging a change
    pub(crate) fn write_back_path(&mut self, path: Path) {
        self.attrs.path = Some(path);
    }

    pub(crate) fn take_group(&mut self) -> Vec<String> {
        std::mem::take(&mut self.attrs.group)
    }

    pub fn cached_bbox(&self, with_transform: bool) -> Option<BBox> {
        if with_transform {
            self.bbox.transform
        } else {
            self.bbox.plain
        }
    }

    pub(crate) fn cache_bbox(&mut self, with_transform: bool, bbox: BBox) {
        if with_transform {
            self.bbox.transform = Some(bbox);
        } else {
            self.bbox.plain = Some(bbox);
        }
    }

    pub(crate) fn invalidate_bbox(&mut self) {
        self.bbox = BBoxCache::default();
    }

    pub(crate) fn invalidate_transform_bbox(&mut self) {
        self.bbox.transform = None;
    }

    /// Outline of the sprite in its own coordinates.
    ///
    /// Text has no outline of its own; its box comes from measurement.
    pub fn shape_path(&self) -> Option<Path> {
        let a = &self.attrs;
        let x = a.x.unwrap_or(0.0);
        let y = a.y.unwrap_or(0.0);
        match self.kind {
            SpriteType::Circle | SpriteType::Ellipse => {
                let rx = a.rx.or(a.radius).unwrap_or(0.0);
                let ry = a.ry.or(a.radius).unwrap_or(0.0);
                Some(ellipse_path(x, y, rx, ry))
            }
            SpriteType::Rect => Some(rect_path(
                x,
                y,
                a.width.unwrap_or(0.0),
                a.height.unwrap_or(0.0),
                a.radius.unwrap_or(0.0),
            )),
            SpriteType::Image => Some(rect_path(
                x,
                y,
                a.width.unwrap_or(0.0),
                a.height.unwrap_or(0.0),
                0.0,
            )),
            SpriteType::Path => Some(a.path.clone().unwrap_or_default()),
            SpriteType::Text => None,
        }
    }

    /// Plain bounding box for every type except text
    pub fn shape_bbox(&self) -> Option<BBox> {
        self.shape_path()
            .map(|p| crate::draw::path_dimensions(&path_to_absolute(&p)))
    }

    /// Rebuild the transformation list from `translation`, `scaling` and
    /// `rotation`, in that order.
    ///
    /// Centers are given in sprite coordinates and move with the translation.
    pub fn update_transformations(&mut self, plain: BBox) {
        let a = &self.attrs;
        let shift = a
            .translation
            .map(|t| dvec2(t.x, t.y))
            .unwrap_or(DVec2::ZERO);
        let mid = plain.center();

        let mut list = Vec::with_capacity(3);
        if let Some(t) = a.translation {
            list.push(Transformation::Translate { x: t.x, y: t.y });
        }
        if let Some(s) = a.scaling {
            let center = dvec2(s.cx.unwrap_or(mid.x), s.cy.unwrap_or(mid.y)) + shift;
            list.push(Transformation::Scale {
                x: s.x,
                y: s.y,
                center,
            });
        }
        if let Some(r) = a.rotation {
            let center = dvec2(r.x.unwrap_or(mid.x), r.y.unwrap_or(mid.y)) + shift;
            list.push(Transformation::Rotate {
                degrees: r.degrees,
                center,
            });
        }
        self.transformations = list;
    }

    /// Fold the transformation list into one matrix
    pub fn compose_transformations(&self) -> Composed {
        let mut matrix = Matrix::identity();
        let mut rotation = 0.0;
        let mut scale = DVec2::ONE;
        for t in &self.transformations {
            match *t {
                Transformation::Translate { x, y } => {
                    matrix.translate(x, y);
                }
                Transformation::Scale { x, y, center } => {
                    matrix.scale(x, y, center.x, center.y);
                    scale *= dvec2(x, y);
                }
                Transformation::Rotate { degrees, center } => {
                    matrix.rotate(degrees, center.x, center.y);
                    rotation += degrees;
                }
            }
        }
        Composed {
            matrix,
            rotation,
            scale,
        }
    }
}
