//! Facet-derived VML element types, built from the element tree and
//! serialized with `facet-xml`.
//!
//! Only attributes that have a field on the element type are written out.

use facet::Facet;
use facet_xml as xml;
use facet_xml::SerializeOptions;

use super::dom::{Node, NodeId, Tag, VmlDocument};
use crate::errors::SurfaceError;

/// Surface root and clip overlays (`<div>`)
#[derive(Facet, Debug, Clone, Default)]
#[facet(rename = "div")]
pub struct Div {
    #[facet(xml::attribute)]
    pub class: Option<String>,
    #[facet(xml::attribute)]
    pub style: Option<String>,
    #[facet(xml::elements)]
    pub children: Vec<VmlNode>,
}

/// Any node the engine emits
#[derive(Facet, Debug, Clone)]
#[repr(u8)]
pub enum VmlNode {
    #[facet(rename = "div")]
    Div(Div),
    #[facet(rename = "vml:shape")]
    Shape(Shape),
    #[facet(rename = "vml:image")]
    Image(Image),
    #[facet(rename = "vml:path")]
    Path(Rail),
    #[facet(rename = "vml:textpath")]
    TextPath(TextPath),
    #[facet(rename = "vml:skew")]
    Skew(Skew),
    #[facet(rename = "vml:fill")]
    Fill(Fill),
    #[facet(rename = "vml:stroke")]
    Stroke(Stroke),
}

/// Sprite element for every type but images (`<vml:shape>`)
#[derive(Facet, Debug, Clone, Default)]
pub struct Shape {
    #[facet(xml::attribute)]
    pub id: Option<String>,
    #[facet(xml::attribute)]
    pub coordsize: Option<String>,
    #[facet(xml::attribute)]
    pub coordorigin: Option<String>,
    #[facet(xml::attribute)]
    pub path: Option<String>,
    #[facet(xml::attribute)]
    pub href: Option<String>,
    #[facet(xml::attribute)]
    pub title: Option<String>,
    #[facet(xml::attribute)]
    pub target: Option<String>,
    #[facet(xml::attribute)]
    pub cursor: Option<String>,
    #[facet(xml::attribute)]
    pub class: Option<String>,
    #[facet(xml::attribute)]
    pub style: Option<String>,
    #[facet(xml::elements)]
    pub children: Vec<VmlNode>,
}

/// Image sprite element (`<vml:image>`)
#[derive(Facet, Debug, Clone, Default)]
pub struct Image {
    #[facet(xml::attribute)]
    pub id: Option<String>,
    #[facet(xml::attribute)]
    pub coordsize: Option<String>,
    #[facet(xml::attribute)]
    pub coordorigin: Option<String>,
    #[facet(xml::attribute)]
    pub src: Option<String>,
    #[facet(xml::attribute)]
    pub title: Option<String>,
    #[facet(xml::attribute)]
    pub cursor: Option<String>,
    #[facet(xml::attribute)]
    pub class: Option<String>,
    #[facet(xml::attribute)]
    pub style: Option<String>,
    #[facet(xml::elements)]
    pub children: Vec<VmlNode>,
}

/// Text rail (`<vml:path>`)
#[derive(Facet, Debug, Clone, Default)]
pub struct Rail {
    #[facet(xml::attribute)]
    pub v: Option<String>,
    #[facet(xml::attribute)]
    pub textpathok: Option<String>,
}

#[derive(Facet, Debug, Clone, Default)]
pub struct TextPath {
    #[facet(xml::attribute)]
    pub on: Option<String>,
    #[facet(xml::attribute)]
    pub string: Option<String>,
    #[facet(xml::attribute)]
    pub style: Option<String>,
}

/// Transform carrier (`<vml:skew>`)
#[derive(Facet, Debug, Clone, Default)]
pub struct Skew {
    #[facet(xml::attribute)]
    pub on: Option<String>,
    #[facet(xml::attribute)]
    pub origin: Option<String>,
    #[facet(xml::attribute)]
    pub matrix: Option<String>,
    #[facet(xml::attribute)]
    pub offset: Option<String>,
}

#[derive(Facet, Debug, Clone, Default)]
pub struct Fill {
    #[facet(xml::attribute)]
    pub on: Option<String>,
    #[facet(xml::attribute)]
    pub opacity: Option<String>,
    #[facet(xml::attribute)]
    pub color: Option<String>,
    #[facet(xml::attribute)]
    pub src: Option<String>,
    #[facet(xml::attribute, rename = "type")]
    pub type_: Option<String>,
    #[facet(xml::attribute)]
    pub angle: Option<String>,
    #[facet(xml::attribute)]
    pub method: Option<String>,
    #[facet(xml::attribute)]
    pub colors: Option<String>,
    #[facet(xml::attribute)]
    pub rotate: Option<String>,
}

#[derive(Facet, Debug, Clone, Default)]
pub struct Stroke {
    #[facet(xml::attribute)]
    pub on: Option<String>,
    #[facet(xml::attribute)]
    pub color: Option<String>,
    #[facet(xml::attribute)]
    pub dashstyle: Option<String>,
    #[facet(xml::attribute)]
    pub joinstyle: Option<String>,
    #[facet(xml::attribute)]
    pub endcap: Option<String>,
    #[facet(xml::attribute)]
    pub miterlimit: Option<String>,
    #[facet(xml::attribute)]
    pub weight: Option<String>,
    #[facet(xml::attribute)]
    pub opacity: Option<String>,
}

fn attr(node: &Node, name: &str) -> Option<String> {
    node.attr(name).map(str::to_string)
}

/// Space-separated classes, or `None` when there are none
fn class_list(node: &Node) -> Option<String> {
    let classes = node.classes();
    (!classes.is_empty()).then(|| classes.join(" "))
}

/// Inline style as `prop:value;prop:value`, or `None` when empty
fn inline_style(node: &Node) -> Option<String> {
    let style = node.styles();
    (!style.is_empty()).then(|| {
        style
            .iter()
            .map(|(k, v)| format!("{}:{}", k, v))
            .collect::<Vec<_>>()
            .join(";")
    })
}

impl VmlDocument {
    /// Typed element for node `id` and its subtree
    pub fn element(&self, id: NodeId) -> Option<VmlNode> {
        let node = self.get(id)?;
        let children = || {
            node.children()
                .iter()
                .filter_map(|child| self.element(*child))
                .collect::<Vec<_>>()
        };
        let element = match node.tag() {
            Tag::Div => VmlNode::Div(Div {
                class: class_list(node),
                style: inline_style(node),
                children: children(),
            }),
            Tag::Shape => VmlNode::Shape(Shape {
                id: attr(node, "id"),
                coordsize: attr(node, "coordsize"),
                coordorigin: attr(node, "coordorigin"),
                path: attr(node, "path"),
                href: attr(node, "href"),
                title: attr(node, "title"),
                target: attr(node, "target"),
                cursor: attr(node, "cursor"),
                class: class_list(node),
                style: inline_style(node),
                children: children(),
            }),
            Tag::Image => VmlNode::Image(Image {
                id: attr(node, "id"),
                coordsize: attr(node, "coordsize"),
                coordorigin: attr(node, "coordorigin"),
                src: attr(node, "src"),
                title: attr(node, "title"),
                cursor: attr(node, "cursor"),
                class: class_list(node),
                style: inline_style(node),
                children: children(),
            }),
            Tag::Path => VmlNode::Path(Rail {
                v: attr(node, "v"),
                textpathok: attr(node, "textpathok"),
            }),
            Tag::TextPath => VmlNode::TextPath(TextPath {
                on: attr(node, "on"),
                string: attr(node, "string"),
                style: inline_style(node),
            }),
            Tag::Skew => VmlNode::Skew(Skew {
                on: attr(node, "on"),
                origin: attr(node, "origin"),
                matrix: attr(node, "matrix"),
                offset: attr(node, "offset"),
            }),
            Tag::Fill => VmlNode::Fill(Fill {
                on: attr(node, "on"),
                opacity: attr(node, "opacity"),
                color: attr(node, "color"),
                src: attr(node, "src"),
                type_: attr(node, "type"),
                angle: attr(node, "angle"),
                method: attr(node, "method"),
                colors: attr(node, "colors"),
                rotate: attr(node, "rotate"),
            }),
            Tag::Stroke => VmlNode::Stroke(Stroke {
                on: attr(node, "on"),
                color: attr(node, "color"),
                dashstyle: attr(node, "dashstyle"),
                joinstyle: attr(node, "joinstyle"),
                endcap: attr(node, "endcap"),
                miterlimit: attr(node, "miterlimit"),
                weight: attr(node, "weight"),
                opacity: attr(node, "opacity"),
            }),
        };
        Some(element)
    }

    /// Serialize the `div` rooted at `root`.
    ///
    /// A removed root serializes to nothing.
    pub fn to_markup(&self, root: NodeId) -> Result<String, SurfaceError> {
        let div = match self.element(root) {
            None => return Ok(String::new()),
            Some(VmlNode::Div(div)) => div,
            Some(_) => {
                return Err(SurfaceError::Markup {
                    message: "markup root must be a div".to_string(),
                });
            }
        };
        facet_xml::to_string_with_options(&div, &SerializeOptions::default())
            .map_err(|e| SurfaceError::Markup {
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (VmlDocument, NodeId, NodeId) {
        let mut doc = VmlDocument::new();
        let root = doc.create(Tag::Div);
        let shape = doc.create(Tag::Shape);
        doc.set_attr(shape, "id", "a");
        doc.set_attr(shape, "path", "m0,0 l10,10 x");
        doc.add_class(shape, "x-vml-sprite");
        doc.add_class(shape, "x-hide-visibility");
        doc.set_style(shape, "z-index", "0");
        doc.set_style(shape, "cursor", "move");
        doc.append_child(root, shape);
        let fill = doc.create(Tag::Fill);
        doc.set_bool(fill, "on", false);
        doc.append_child(shape, fill);
        (doc, root, shape)
    }

    #[test]
    fn tree_becomes_typed_elements() {
        let (doc, root, _) = sample();
        let Some(VmlNode::Div(div)) = doc.element(root) else {
            panic!("root is not a div");
        };
        assert_eq!(div.class, None);
        let [VmlNode::Shape(shape)] = div.children.as_slice() else {
            panic!("expected one shape, got {:?}", div.children);
        };
        assert_eq!(shape.id.as_deref(), Some("a"));
        assert_eq!(shape.path.as_deref(), Some("m0,0 l10,10 x"));
        assert_eq!(shape.class.as_deref(), Some("x-vml-sprite x-hide-visibility"));
        assert_eq!(shape.style.as_deref(), Some("z-index:0;cursor:move"));
        let [VmlNode::Fill(fill)] = shape.children.as_slice() else {
            panic!("expected one fill, got {:?}", shape.children);
        };
        assert_eq!(fill.on.as_deref(), Some("f"));
        assert_eq!(fill.color, None);
    }

    #[test]
    fn serializes_vml_elements() {
        let (doc, root, _) = sample();
        let markup = doc.to_markup(root).unwrap();
        assert!(markup.starts_with("<div"), "{markup}");
        assert!(markup.contains("<vml:shape"), "{markup}");
        assert!(markup.contains("<vml:fill"), "{markup}");
        assert!(markup.contains("m0,0 l10,10 x"), "{markup}");
        assert!(markup.contains("z-index:0;cursor:move"), "{markup}");
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut doc = VmlDocument::new();
        let root = doc.create(Tag::Div);
        let shape = doc.create(Tag::Shape);
        let textpath = doc.create(Tag::TextPath);
        doc.append_child(root, shape);
        doc.append_child(shape, textpath);
        doc.set_attr(textpath, "string", "a < b & c");
        let markup = doc.to_markup(root).unwrap();
        assert!(markup.contains("a &lt; b &amp; c"), "{markup}");
    }

    #[test]
    fn removed_root_is_empty_and_non_div_root_is_an_error() {
        let (mut doc, root, shape) = sample();
        assert!(matches!(doc.to_markup(shape), Err(SurfaceError::Markup { .. })));
        doc.remove(root);
        assert_eq!(doc.to_markup(root).unwrap(), "");
    }
}
