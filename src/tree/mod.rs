//! Content tree of nested elements and text leaves.
//!
//! This module handles:
//! - Building trees by hand or from a JSON [`TreeSpec`]
//! - Walking and detaching nodes
//! - Reading and writing leaf text and element styles

mod spec;
mod types;

pub use spec::TreeSpec;
pub use types::{NodeId, StyleMap, Tree};

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Tree, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new();
        let root = tree.root();
        let first = tree.append_text(root, "Hello ");
        let em = tree.append_element(root);
        let second = tree.append_text(em, "world");
        (tree, first, em, second)
    }

    #[test]
    fn test_new_tree_has_empty_root_element() {
        let tree = Tree::new();
        assert!(tree.is_element(tree.root()));
        assert!(tree.children(tree.root()).is_empty());
        assert_eq!(tree.text_content(tree.root()), "");
    }

    #[test]
    fn test_text_content_is_document_order() {
        let (tree, ..) = sample();
        assert_eq!(tree.text_content(tree.root()), "Hello world");
    }

    #[test]
    fn test_detach_removes_from_parent() {
        let (mut tree, _, em, second) = sample();
        tree.detach(em);
        assert_eq!(tree.text_content(tree.root()), "Hello ");
        assert!(!tree.is_attached(em));
        assert!(!tree.is_attached(second), "descendants go with the element");
        assert_eq!(tree.text(second), Some("world"), "detached text is kept");
    }

    #[test]
    fn test_detach_root_is_noop() {
        let (mut tree, ..) = sample();
        let root = tree.root();
        tree.detach(root);
        assert_eq!(tree.children(root).len(), 2);
    }

    #[test]
    fn test_set_text_ignores_elements() {
        let (mut tree, first, em, _) = sample();
        tree.set_text(em, "nope");
        tree.set_text(first, "Goodbye ");
        assert_eq!(tree.text_content(tree.root()), "Goodbye world");
    }

    #[test]
    fn test_style_round_trip_on_element_only() {
        let (mut tree, first, em, _) = sample();
        tree.set_style(em, "line-height", "20px");
        tree.set_style(first, "line-height", "30px");
        assert_eq!(tree.style(em, "line-height"), Some("20px"));
        assert_eq!(tree.style(first, "line-height"), None);
    }

    #[test]
    fn test_descendants_document_order() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.append_element(root);
        let a1 = tree.append_text(a, "a1");
        let b = tree.append_element(root);
        let b1 = tree.append_element(b);
        let b11 = tree.append_text(b1, "b11");
        assert_eq!(tree.descendants(root), vec![a, a1, b, b1, b11]);
    }

    #[test]
    #[should_panic(expected = "cannot append a child to text node")]
    fn test_append_to_text_panics() {
        let (mut tree, first, ..) = sample();
        tree.append_text(first, "x");
    }

    #[test]
    fn test_from_json_builds_nested_tree() {
        let json = r#"{
            "style": {"line-height": "20px"},
            "children": ["Hello ", {"style": {"display": "block"}, "children": ["world"]}]
        }"#;
        let tree = Tree::from_json(json).unwrap();
        let root = tree.root();
        assert_eq!(tree.style(root, "line-height"), Some("20px"));
        assert_eq!(tree.children(root).len(), 2);
        let block = tree.children(root)[1];
        assert_eq!(tree.style(block, "display"), Some("block"));
        assert_eq!(tree.text_content(root), "Hello world");
    }

    #[test]
    fn test_from_json_text_spec_becomes_root_leaf() {
        let tree = Tree::from_json(r#""just text""#).unwrap();
        assert_eq!(tree.children(tree.root()).len(), 1);
        assert_eq!(tree.text_content(tree.root()), "just text");
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Tree::from_json("{\"children\": 3}").is_err());
    }

    #[test]
    fn test_to_spec_skips_detached_nodes() {
        let (mut tree, _, em, _) = sample();
        tree.detach(em);
        let spec = tree.to_spec(tree.root());
        assert_eq!(
            spec,
            TreeSpec::Element {
                style: StyleMap::new(),
                children: vec![TreeSpec::Text("Hello ".to_string())],
            }
        );
    }
}
