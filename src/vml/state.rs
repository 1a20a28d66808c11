//! Per-sprite device resources owned by the engine

use glam::DVec2;

use super::dom::{NodeId, VmlDocument};
use crate::matrix::Matrix;
use crate::types::BBox;

/// Handles to every node rendered for one sprite
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Handles {
    pub element: NodeId,
    pub skew: Option<NodeId>,
    pub fill: Option<NodeId>,
    pub stroke: Option<NodeId>,
    /// Overlay div wrapping the element while a clip is set
    pub clip: Option<NodeId>,
    /// Text rail
    pub path: Option<NodeId>,
    pub textpath: Option<NodeId>,
}

/// Last measured text box. `bbx` shifts the reported origin to match the anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub bbx: f64,
}

impl TextMetrics {
    pub fn bbox(&self) -> BBox {
        BBox::new(
            self.x + self.bbx - self.width / 2.0,
            self.y - self.height / 2.0,
            self.width,
            self.height,
        )
    }
}

#[derive(Clone, Debug)]
pub(crate) struct RenderState {
    pub handles: Handles,
    pub metrics: TextMetrics,
    /// Sprite matrix without the view-box shift
    pub matrix: Matrix,
    pub rotation: f64,
    pub scale: DVec2,
}

impl RenderState {
    pub fn new(element: NodeId) -> Self {
        RenderState {
            handles: Handles {
                element,
                skew: None,
                fill: None,
                stroke: None,
                clip: None,
                path: None,
                textpath: None,
            },
            metrics: TextMetrics::default(),
            matrix: Matrix::identity(),
            rotation: 0.0,
            scale: DVec2::ONE,
        }
    }

    /// The node that sits in the surface root
    pub fn outer(&self) -> NodeId {
        self.handles.clip.unwrap_or(self.handles.element)
    }

    /// Remove every node rendered for the sprite
    pub fn teardown(self, doc: &mut VmlDocument) {
        doc.remove(self.outer());
    }
}

/// Child node in `slot`, created under `parent` on first use
pub(crate) fn child_node(
    doc: &mut VmlDocument,
    slot: &mut Option<NodeId>,
    parent: NodeId,
    tag: super::dom::Tag,
) -> NodeId {
    if let Some(id) = *slot {
        return id;
    }
    let id = doc.create(tag);
    doc.append_child(parent, id);
    *slot = Some(id);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vml::dom::Tag;

    #[test]
    fn teardown_removes_clip_wrapper_and_children() {
        let mut doc = VmlDocument::new();
        let root = doc.create(Tag::Div);
        let element = doc.create(Tag::Shape);
        doc.append_child(root, element);
        let mut state = RenderState::new(element);
        let fill = child_node(&mut doc, &mut state.handles.fill, element, Tag::Fill);
        assert_eq!(child_node(&mut doc, &mut state.handles.fill, element, Tag::Fill), fill);

        let clip = doc.create(Tag::Div);
        doc.insert_before(root, clip, element);
        doc.append_child(clip, element);
        state.handles.clip = Some(clip);

        state.teardown(&mut doc);
        assert!(!doc.contains(fill) && !doc.contains(element) && !doc.contains(clip));
        assert!(doc.children(root).is_empty());
    }

    #[test]
    fn text_box_is_centered_on_anchor() {
        let m = TextMetrics {
            x: 100.0,
            y: 50.0,
            width: 40.0,
            height: 14.0,
            bbx: 20.0,
        };
        assert_eq!(m.bbox(), BBox::new(100.0, 43.0, 40.0, 14.0));
    }
}
