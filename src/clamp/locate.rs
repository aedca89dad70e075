//! Finding the last editable text leaf.

use tracing::trace;

use super::marker::Ellipsis;
use crate::tree::{NodeId, Tree};

/// Find the last text leaf under `container` that still has text to cut.
///
/// Walks down through the last child at each level. Childless elements,
/// empty text and marker-only text met on the way are detached, and the
/// walk restarts from `container`. Returns `None` once `container` has no
/// children left; `container` itself is never detached.
pub fn locate_last(tree: &mut Tree, container: NodeId, ellipsis: &Ellipsis) -> Option<NodeId> {
    'restart: loop {
        let mut current = container;
        loop {
            let Some(&last) = tree.children(current).last() else {
                if current == container {
                    return None;
                }
                trace!(node = current.index(), "pruning empty element");
                tree.detach(current);
                continue 'restart;
            };
            if tree.is_element(last) {
                current = last;
                continue;
            }
            let editable = tree
                .text(last)
                .is_some_and(|value| !value.is_empty() && !ellipsis.is_marker_only(value));
            if editable {
                return Some(last);
            }
            trace!(node = last.index(), "pruning spent text leaf");
            tree.detach(last);
            continue 'restart;
        }
    }
}
