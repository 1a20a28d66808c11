//! Engine constants and per-surface settings

use super::sprite::{Paint, SpriteAttrs, SpriteType, TextAnchor};
use crate::types::ViewBox;

/// Native coordinate units per logical unit
pub const ZOOM: f64 = 21600.0;

/// Logical stroke width to native stroke weight.
///
/// Empirical; kept for visual compatibility.
pub const STROKE_WIDTH_SCALE: f64 = 0.75;

/// Extra pixels added to measured text height.
///
/// Empirical; covers baseline and leading differences that cannot be measured.
pub const TEXT_HEIGHT_PADDING: f64 = 2.0;

/// Thinnest stroke VML draws; thinner strokes fade instead
pub const MIN_STROKE_WEIGHT: f64 = 1.0;

/// Signed 16-bit range of native offset fields
pub const OFFSET_MIN: f64 = -32768.0;
pub const OFFSET_MAX: f64 = 32767.0;

pub const DEFAULT_FONT: &str = "10px \"Arial\"";
pub const DEFAULT_FONT_SIZE: f64 = 10.0;
pub const DEFAULT_TEXT_FILL: &str = "#000";
pub const DEFAULT_MITER_LIMIT: f64 = 8.0;
pub const DEFAULT_LINECAP: &str = "round";

/// Settings for one surface
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceConfig {
    pub width: f64,
    pub height: f64,
    pub view_box: Option<ViewBox>,
    /// Prefix for every CSS class the engine emits
    pub css_prefix: String,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        SurfaceConfig {
            width: 0.0,
            height: 0.0,
            view_box: None,
            css_prefix: "x-".to_string(),
        }
    }
}

impl SurfaceConfig {
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_view_box(mut self, view_box: ViewBox) -> Self {
        self.view_box = Some(view_box);
        self
    }

    pub fn with_css_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.css_prefix = prefix.into();
        self
    }

    /// Class on the surface root
    pub fn base_class(&self) -> String {
        format!("{}vml-base", self.css_prefix)
    }

    /// Class on every sprite element
    pub fn sprite_class(&self) -> String {
        format!("{}vml-sprite", self.css_prefix)
    }

    /// Class that hides a sprite
    pub fn hidden_class(&self) -> String {
        format!("{}hide-visibility", self.css_prefix)
    }
}

/// Fill in the minimum attributes a sprite type needs to render.
///
/// Only unset values are filled; anything the caller set wins.
pub fn apply_min_defaults(kind: SpriteType, attrs: &mut SpriteAttrs) {
    fn zero(slot: &mut Option<f64>) {
        slot.get_or_insert(0.0);
    }

    match kind {
        SpriteType::Circle | SpriteType::Ellipse => {
            zero(&mut attrs.x);
            zero(&mut attrs.y);
            attrs.fill.get_or_insert_with(|| Paint::from("none"));
        }
        SpriteType::Rect => {
            zero(&mut attrs.x);
            zero(&mut attrs.y);
            zero(&mut attrs.width);
            zero(&mut attrs.height);
            attrs.fill.get_or_insert_with(|| Paint::from("none"));
        }
        SpriteType::Path => {
            attrs.fill.get_or_insert_with(|| Paint::from("none"));
        }
        SpriteType::Text => {
            zero(&mut attrs.x);
            zero(&mut attrs.y);
            attrs.text_anchor.get_or_insert(TextAnchor::Start);
            attrs.font.get_or_insert_with(|| DEFAULT_FONT.to_string());
            attrs.fill.get_or_insert_with(|| Paint::from(DEFAULT_TEXT_FILL));
        }
        SpriteType::Image => {
            zero(&mut attrs.x);
            zero(&mut attrs.y);
            zero(&mut attrs.width);
            zero(&mut attrs.height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_names_follow_prefix() {
        let config = SurfaceConfig::default().with_css_prefix("ext-");
        assert_eq!(config.base_class(), "ext-vml-base");
        assert_eq!(config.sprite_class(), "ext-vml-sprite");
        assert_eq!(config.hidden_class(), "ext-hide-visibility");
    }

    #[test]
    fn defaults_never_override_explicit_values() {
        let mut attrs = SpriteAttrs {
            x: Some(4.0),
            fill: Some(Paint::from("red")),
            ..Default::default()
        };
        apply_min_defaults(SpriteType::Text, &mut attrs);
        assert_eq!(attrs.x, Some(4.0));
        assert_eq!(attrs.y, Some(0.0));
        assert_eq!(attrs.fill, Some(Paint::from("red")));
        assert_eq!(attrs.font.as_deref(), Some(DEFAULT_FONT));
        assert_eq!(attrs.text_anchor, Some(TextAnchor::Start));
    }

    #[test]
    fn shapes_default_to_no_fill() {
        let mut attrs = SpriteAttrs::default();
        apply_min_defaults(SpriteType::Rect, &mut attrs);
        assert_eq!(attrs.fill, Some(Paint::from("none")));
        assert_eq!(attrs.width, Some(0.0));
    }
}
