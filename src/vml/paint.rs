//! Fill and stroke sub-elements

use super::dom::{Tag, VmlDocument};
use super::state::{RenderState, child_node};
use crate::color::to_hex;
use crate::draw::fmt_num;
use crate::log::{debug, warn};
use crate::surface::config::{
    DEFAULT_LINECAP, DEFAULT_MITER_LIMIT, MIN_STROKE_WEIGHT, STROKE_WIDTH_SCALE,
};
use crate::surface::{GradientRegistry, Paint, SpriteAttrs};

/// Target of a `url(...)` paint, with quotes and whitespace stripped
fn paint_url(value: &str) -> Option<&str> {
    let value = value.trim();
    let head = value.get(..4)?;
    if !head.eq_ignore_ascii_case("url(") || !value.ends_with(')') {
        return None;
    }
    Some(value[4..value.len() - 1].trim().trim_matches(|c| c == '"' || c == '\''))
}

fn color_value(value: &str) -> String {
    to_hex(value).unwrap_or_else(|| value.to_string())
}

/// Update the fill node from `attrs`, creating it on first use
pub(crate) fn set_fill(
    doc: &mut VmlDocument,
    state: &mut RenderState,
    attrs: &SpriteAttrs,
    gradients: &GradientRegistry,
) {
    let element = state.handles.element;
    let fill = child_node(doc, &mut state.handles.fill, element, Tag::Fill);

    let value = attrs.fill.as_ref().and_then(Paint::first).map(str::trim);
    let value = match value {
        None | Some("") | Some("none") => {
            doc.set_bool(fill, "on", false);
            return;
        }
        Some(v) => v,
    };

    if let Some(opacity) = attrs.opacity {
        doc.set_attr(fill, "opacity", fmt_num(opacity));
    }
    if let Some(opacity) = attrs.fill_opacity {
        doc.set_attr(fill, "opacity", fmt_num(opacity));
    }
    doc.set_bool(fill, "on", true);

    let Some(url) = paint_url(value) else {
        doc.set_attr(fill, "color", color_value(value));
        doc.remove_attr(fill, "src");
        doc.set_attr(fill, "type", "solid");
        return;
    };

    match url.strip_prefix('#').and_then(|id| gradients.get(id)) {
        Some(gradient) => {
            let rotation = attrs.rotation.map_or(0.0, |r| r.degrees);
            let mut angle = -(gradient.angle + 270.0 + rotation) % 360.0;
            // VML treats 0 as no direction
            if angle == 0.0 {
                angle = 180.0;
            }
            doc.set_attr(fill, "angle", fmt_num(angle));
            doc.set_attr(fill, "type", "gradient");
            doc.set_attr(fill, "method", "sigma");
            doc.set_attr(fill, "colors", gradient.colors.clone());
        }
        None => {
            debug!(url, "fill is not a registered gradient, tiling it as an image");
            doc.set_attr(fill, "src", url);
            doc.set_attr(fill, "type", "tile");
            doc.set_bool(fill, "rotate", true);
        }
    }
}

/// Update the stroke node from `attrs`, creating it on first use
pub(crate) fn set_stroke(doc: &mut VmlDocument, state: &mut RenderState, attrs: &SpriteAttrs) {
    let element = state.handles.element;
    let stroke = child_node(doc, &mut state.handles.stroke, element, Tag::Stroke);

    let value = attrs.stroke.as_ref().and_then(Paint::first).map(str::trim);
    let value = match value {
        Some(v) if !matches!(v, "" | "none" | "0") && attrs.stroke_width != Some(0.0) => v,
        _ => {
            doc.set_bool(stroke, "on", false);
            return;
        }
    };
    doc.set_bool(stroke, "on", true);

    if paint_url(value).is_some() {
        warn!(value, "gradient strokes are not supported, keeping the previous color");
    } else {
        doc.set_attr(stroke, "color", color_value(value));
    }

    let dashed = attrs
        .stroke_dasharray
        .as_deref()
        .is_some_and(|d| !d.trim().is_empty() && d.trim() != "none");
    doc.set_attr(stroke, "dashstyle", if dashed { "2 2" } else { "solid" });
    if let Some(join) = &attrs.stroke_linejoin {
        doc.set_attr(stroke, "joinstyle", join.clone());
    }
    doc.set_attr(
        stroke,
        "endcap",
        attrs.stroke_linecap.as_deref().unwrap_or(DEFAULT_LINECAP),
    );
    let miter = attrs
        .stroke_miterlimit
        .filter(|m| *m != 0.0)
        .unwrap_or(DEFAULT_MITER_LIMIT);
    doc.set_attr(stroke, "miterlimit", fmt_num(miter));

    let width = attrs.stroke_width.unwrap_or(1.0) * STROKE_WIDTH_SCALE;
    // Zero reads as unset, like the other stroke numbers
    let mut opacity = attrs.stroke_opacity.filter(|o| *o != 0.0).unwrap_or(1.0);
    let weight = if width < MIN_STROKE_WEIGHT {
        // Too thin to draw; fade a minimum-weight line instead
        opacity *= width;
        MIN_STROKE_WEIGHT
    } else {
        width
    };
    doc.set_attr(stroke, "weight", fmt_num(weight));
    doc.set_attr(stroke, "opacity", fmt_num(opacity));
}
