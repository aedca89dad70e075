//! JSON description of a content tree.

use serde::{Deserialize, Serialize};

use super::types::{NodeId, StyleMap, Tree};

/// Serializable shape of a tree node.
///
/// A bare string is a text leaf; an object is an element:
///
/// ```json
/// {"style": {"line-height": "20px"}, "children": ["Hello ", {"children": ["world"]}]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeSpec {
    Text(String),
    Element {
        #[serde(default, skip_serializing_if = "StyleMap::is_empty")]
        style: StyleMap,
        #[serde(default)]
        children: Vec<TreeSpec>,
    },
}

impl Tree {
    /// Build a tree from a spec. A text spec becomes the root's only leaf.
    pub fn from_spec(spec: &TreeSpec) -> Self {
        let mut tree = Self::new();
        let root = tree.root();
        match spec {
            TreeSpec::Text(value) => {
                tree.append_text(root, value.clone());
            }
            TreeSpec::Element { style, children } => {
                for (property, value) in style {
                    tree.set_style(root, property.clone(), value.clone());
                }
                tree.append_specs(root, children);
            }
        }
        tree
    }

    /// Parse a JSON tree spec.
    ///
    /// # Errors
    /// Returns an error if `json` is not a valid [`TreeSpec`].
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let spec: TreeSpec = serde_json::from_str(json)?;
        Ok(Self::from_spec(&spec))
    }

    /// Snapshot of the attached subtree below `id`.
    pub fn to_spec(&self, id: NodeId) -> TreeSpec {
        if let Some(value) = self.text(id) {
            return TreeSpec::Text(value.to_string());
        }
        TreeSpec::Element {
            style: self.styles(id).cloned().unwrap_or_default(),
            children: self
                .children(id)
                .iter()
                .map(|child| self.to_spec(*child))
                .collect(),
        }
    }

    fn append_specs(&mut self, parent: NodeId, specs: &[TreeSpec]) {
        // (parent, spec) pairs, processed in document order
        let mut pending: Vec<(NodeId, &TreeSpec)> =
            specs.iter().rev().map(|spec| (parent, spec)).collect();
        while let Some((parent, spec)) = pending.pop() {
            match spec {
                TreeSpec::Text(value) => {
                    self.append_text(parent, value.clone());
                }
                TreeSpec::Element { style, children } => {
                    let element = self.append_element(parent);
                    for (property, value) in style {
                        self.set_style(element, property.clone(), value.clone());
                    }
                    pending.extend(children.iter().rev().map(|child| (element, child)));
                }
            }
        }
    }
}
