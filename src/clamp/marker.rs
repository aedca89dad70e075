//! Trailing truncation marker.

use super::options::DEFAULT_TRUNCATION_MARKER;
use crate::tree::{NodeId, Tree};

/// Applies and strips the marker shown at the end of truncated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ellipsis {
    marker: String,
}

impl Default for Ellipsis {
    fn default() -> Self {
        Self::new(DEFAULT_TRUNCATION_MARKER)
    }
}

impl Ellipsis {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Set `leaf` to `text` followed by the marker.
    pub fn apply(&self, tree: &mut Tree, leaf: NodeId, text: &str) {
        let mut value = String::with_capacity(text.len() + self.marker.len());
        value.push_str(text);
        value.push_str(&self.marker);
        tree.set_text(leaf, value);
    }

    /// Remove one trailing marker; unmarked values come back unchanged.
    pub fn strip<'a>(&self, value: &'a str) -> &'a str {
        value.strip_suffix(self.marker.as_str()).unwrap_or(value)
    }

    /// Returns true if `value` is nothing but the marker.
    pub fn is_marker_only(&self, value: &str) -> bool {
        value == self.marker
    }
}
