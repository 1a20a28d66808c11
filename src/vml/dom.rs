//! Retained VML element tree.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Removing a node
//! removes its whole subtree; the freed slots are never reused, so a stale
//! handle simply stops resolving.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    Div,
    Shape,
    Image,
    Path,
    TextPath,
    Skew,
    Fill,
    Stroke,
}

impl Tag {
    /// Whether elements of this tag expose a native slot for `attr`
    pub fn has_slot(self, attr: &str) -> bool {
        match self {
            Tag::Shape => matches!(attr, "href" | "title" | "target" | "cursor"),
            Tag::Image => matches!(attr, "title" | "cursor"),
            _ => false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    tag: Tag,
    attrs: Vec<(String, String)>,
    style: Vec<(String, String)>,
    classes: Vec<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    fn new(tag: Tag) -> Self {
        Node {
            tag,
            attrs: Vec::new(),
            style: Vec::new(),
            classes: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        lookup(&self.attrs, name)
    }

    pub fn style(&self, prop: &str) -> Option<&str> {
        lookup(&self.style, prop)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Inline style properties in the order they were first set
    pub fn styles(&self) -> &[(String, String)] {
        &self.style
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

fn upsert(pairs: &mut Vec<(String, String)>, key: &str, value: String) {
    match pairs.iter_mut().find(|(k, _)| k == key) {
        Some(slot) => slot.1 = value,
        None => pairs.push((key.to_string(), value)),
    }
}

/// VML boolean
pub fn vml_bool(value: bool) -> &'static str {
    if value { "t" } else { "f" }
}

#[derive(Clone, Debug, Default)]
pub struct VmlDocument {
    nodes: Vec<Option<Node>>,
}

impl VmlDocument {
    pub fn new() -> Self {
        VmlDocument::default()
    }

    /// Create a detached node
    pub fn create(&mut self, tag: Tag) -> NodeId {
        self.nodes.push(Some(Node::new(tag)));
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unlink `child` from its parent, keeping its subtree
    pub fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.get(child).and_then(Node::parent) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = None;
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) {
            return;
        }
        self.detach(child);
        if let Some(p) = self.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Insert `child` into `parent` just before `before`, or at the end if
    /// `before` is not one of its children
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, before: NodeId) {
        if !self.contains(parent) || !self.contains(child) {
            return;
        }
        self.detach(child);
        if let Some(p) = self.get_mut(parent) {
            let at = p
                .children
                .iter()
                .position(|c| *c == before)
                .unwrap_or(p.children.len());
            p.children.insert(at, child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Remove `id` and everything below it
    pub fn remove(&mut self, id: NodeId) {
        self.detach(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(next.0).and_then(Option::take) {
                stack.extend(node.children);
            }
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id).and_then(|n| n.attr(name))
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(node) = self.get_mut(id) {
            upsert(&mut node.attrs, name, value.into());
        }
    }

    pub fn set_bool(&mut self, id: NodeId, name: &str, value: bool) {
        self.set_attr(id, name, vml_bool(value));
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(node) = self.get_mut(id) {
            node.attrs.retain(|(k, _)| k != name);
        }
    }

    pub fn style(&self, id: NodeId, prop: &str) -> Option<&str> {
        self.get(id).and_then(|n| n.style(prop))
    }

    /// Set an inline style property; an empty value removes it
    pub fn set_style(&mut self, id: NodeId, prop: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(node) = self.get_mut(id) {
            if value.is_empty() {
                node.style.retain(|(k, _)| k != prop);
            } else {
                upsert(&mut node.style, prop, value);
            }
        }
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(node) = self.get_mut(id) {
            if !node.has_class(class) {
                node.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(node) = self.get_mut(id) {
            node.classes.retain(|c| c != class);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.get(id).is_some_and(|n| n.has_class(class))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_twice_replaces_in_place() {
        let mut doc = VmlDocument::new();
        let node = doc.create(Tag::Stroke);
        doc.set_attr(node, "on", "t");
        doc.set_attr(node, "color", "#000000");
        doc.set_attr(node, "on", "f");
        assert_eq!(doc.attr(node, "on"), Some("f"));
        let names: Vec<_> = doc.get(node).unwrap().attrs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["on", "color"]);
        doc.set_style(node, "left", "1px");
        doc.set_style(node, "left", "");
        assert_eq!(doc.style(node, "left"), None);
    }

    #[test]
    fn remove_takes_the_subtree() {
        let mut doc = VmlDocument::new();
        let root = doc.create(Tag::Div);
        let clip = doc.create(Tag::Div);
        let shape = doc.create(Tag::Shape);
        let skew = doc.create(Tag::Skew);
        doc.append_child(root, clip);
        doc.append_child(clip, shape);
        doc.append_child(shape, skew);
        doc.remove(clip);
        assert!(!doc.contains(clip) && !doc.contains(shape) && !doc.contains(skew));
        assert!(doc.children(root).is_empty());
        assert_eq!(doc.len(), 1);
        // Stale handles are ignored
        doc.set_attr(shape, "id", "gone");
        assert_eq!(doc.attr(shape, "id"), None);
    }

    #[test]
    fn insert_before_and_reparent() {
        let mut doc = VmlDocument::new();
        let root = doc.create(Tag::Div);
        let a = doc.create(Tag::Shape);
        let b = doc.create(Tag::Shape);
        let clip = doc.create(Tag::Div);
        doc.append_child(root, a);
        doc.append_child(root, b);
        doc.insert_before(root, clip, b);
        doc.append_child(clip, b);
        assert_eq!(doc.children(root), [a, clip]);
        assert_eq!(doc.children(clip), [b]);
        assert_eq!(doc.get(b).and_then(Node::parent), Some(clip));
    }

    #[test]
    fn slots_depend_on_tag() {
        assert!(Tag::Shape.has_slot("href"));
        assert!(!Tag::Image.has_slot("href"));
        assert!(Tag::Image.has_slot("cursor"));
        assert!(!Tag::Div.has_slot("title"));
    }
}
