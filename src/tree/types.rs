//! Core tree types.

use std::collections::BTreeMap;

/// Handle to a node inside a [`Tree`].
///
/// Ids stay valid after a node is detached; the node simply stops being
/// reachable from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Index of the node in its tree's arena.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Inline style properties of an element, keyed by CSS-like property name.
pub type StyleMap = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    Element {
        children: Vec<NodeId>,
        style: StyleMap,
    },
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    parent: Option<NodeId>,
    kind: NodeKind,
}

/// A tree of nested elements ending in text leaves.
///
/// Nodes live in an arena and are addressed by [`NodeId`]. The root is
/// always an element and is never detached.
///
/// # Example
///
/// ```
/// use lineclamp::tree::Tree;
///
/// let mut tree = Tree::new();
/// let root = tree.root();
/// tree.append_text(root, "Hello ");
/// let em = tree.append_element(root);
/// tree.append_text(em, "world");
/// assert_eq!(tree.text_content(root), "Hello world");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create a tree holding only an empty root element.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                kind: NodeKind::Element {
                    children: Vec::new(),
                    style: StyleMap::new(),
                },
            }],
        }
    }

    /// Create a tree whose root holds `source` as a single text leaf.
    pub fn from_plain_text(source: &str) -> Self {
        let mut tree = Self::new();
        let root = tree.root();
        tree.append_text(root, source);
        tree
    }

    /// The root element.
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Total number of nodes ever created, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Append a new, empty element as the last child of `parent`.
    ///
    /// # Panics
    /// Panics if `parent` is not an element of this tree.
    pub fn append_element(&mut self, parent: NodeId) -> NodeId {
        self.push_child(
            parent,
            NodeKind::Element {
                children: Vec::new(),
                style: StyleMap::new(),
            },
        )
    }

    /// Append a new text leaf as the last child of `parent`.
    ///
    /// # Panics
    /// Panics if `parent` is not an element of this tree.
    pub fn append_text(&mut self, parent: NodeId, value: impl Into<String>) -> NodeId {
        self.push_child(parent, NodeKind::Text(value.into()))
    }

    fn push_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        match &mut self.nodes[parent.0].kind {
            NodeKind::Element { children, .. } => children.push(id),
            NodeKind::Text(_) => panic!("cannot append a child to text node {parent:?}"),
        }
        self.nodes.push(Node {
            parent: Some(parent),
            kind,
        });
        id
    }

    /// Remove `id` from its parent's children.
    ///
    /// The root and already-detached nodes are left untouched.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let NodeKind::Element { children, .. } = &mut self.nodes[parent.0].kind {
            children.retain(|child| *child != id);
        }
        self.nodes[id.0].parent = None;
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|node| node.parent)
    }

    /// Children of `id` in document order; empty for text leaves.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.nodes.get(id.0).map(|node| &node.kind) {
            Some(NodeKind::Element { children, .. }) => children,
            _ => &[],
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(
            self.nodes.get(id.0).map(|node| &node.kind),
            Some(NodeKind::Element { .. })
        )
    }

    /// Returns true if `id` can be reached from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root() {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Value of a text leaf; `None` for elements.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.nodes.get(id.0).map(|node| &node.kind) {
            Some(NodeKind::Text(value)) => Some(value),
            _ => None,
        }
    }

    /// Replace the value of a text leaf. Elements are left untouched.
    pub fn set_text(&mut self, id: NodeId, value: impl Into<String>) {
        if let Some(Node {
            kind: NodeKind::Text(current),
            ..
        }) = self.nodes.get_mut(id.0)
        {
            *current = value.into();
        }
    }

    /// Inline style property of an element.
    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.styles(id)
            .and_then(|style| style.get(property))
            .map(String::as_str)
    }

    pub fn styles(&self, id: NodeId) -> Option<&StyleMap> {
        match self.nodes.get(id.0).map(|node| &node.kind) {
            Some(NodeKind::Element { style, .. }) => Some(style),
            _ => None,
        }
    }

    /// Set an inline style property on an element. Text leaves are left untouched.
    pub fn set_style(&mut self, id: NodeId, property: impl Into<String>, value: impl Into<String>) {
        if let Some(Node {
            kind: NodeKind::Element { style, .. },
            ..
        }) = self.nodes.get_mut(id.0)
        {
            style.insert(property.into(), value.into());
        }
    }

    /// All nodes below `id` in document order, `id` excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Concatenated text of every leaf below `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(value) = self.text(id) {
            return value.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|node| self.text(node))
            .collect()
    }
}
