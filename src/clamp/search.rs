//! The fit search.
//!
//! [`Truncator::step`] performs exactly one mutation-and-measure cycle on
//! the current leaf. Every step starts from a tree that is known to
//! overflow the target height.
//!
//! Per step, on the current leaf's marker-stripped value:
//! 1. Without a live chunk set, pop the next delimiter (the empty string
//!    once the queue runs dry) and split.
//! 2. With more than one chunk, drop the last chunk, write the rest plus
//!    the marker, and measure. If that fits and a finer delimiter is still
//!    queued, put the chunk back and refine; if nothing finer is queued,
//!    stop. If it still overflows, keep removing at this granularity.
//! 3. With one chunk or none, the granularity is spent. At character
//!    level the leaf is cleared and the search moves to the previous leaf.

use std::collections::VecDeque;

use tracing::trace;

use super::locate::locate_last;
use super::marker::Ellipsis;
use super::split::split_chunks;
use crate::layout::LayoutOracle;
use crate::tree::{NodeId, Tree};

/// Where the search stands after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// Still overflowing; keep removing chunks at this granularity.
    Searching,
    /// A removal fit; it was undone to retry at a finer delimiter.
    Fits,
    /// The current delimiter has nothing left to remove.
    ExhaustedGranularity,
    /// The previous leaf was emptied and the search moved on.
    ExhaustedLeaf,
    Done,
}

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    /// The container fits the target height.
    Fit,
    /// No eligible text is left anywhere in the container.
    Exhausted,
}

/// Result of a single [`Truncator::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue(SearchPhase),
    Finished(Finish),
}

/// Everything the search remembers between steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    leaf: Option<NodeId>,
    chunks: Option<Vec<String>>,
    pending: Option<String>,
    delimiter: String,
    queue: VecDeque<String>,
    phase: SearchPhase,
    steps: usize,
}

impl SearchState {
    fn new(leaf: Option<NodeId>, delimiters: &[String]) -> Self {
        Self {
            leaf,
            chunks: None,
            pending: None,
            delimiter: String::new(),
            queue: delimiters.iter().cloned().collect(),
            phase: SearchPhase::Searching,
            steps: 0,
        }
    }

    /// Leaf being edited, if any text is left.
    pub const fn leaf(&self) -> Option<NodeId> {
        self.leaf
    }

    /// Delimiter of the current (or most recent) chunk set.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Chunks still present in the leaf at the current granularity.
    pub fn chunks(&self) -> Option<&[String]> {
        self.chunks.as_deref()
    }

    /// The chunk removed by the latest step, if it is still removed.
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Delimiters not tried yet on this leaf.
    pub fn queued(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }

    pub const fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Steps taken so far.
    pub const fn steps(&self) -> usize {
        self.steps
    }
}

/// Drives the fit search on one container.
#[derive(Debug, Clone)]
pub struct Truncator {
    container: NodeId,
    target_height: f32,
    delimiters: Vec<String>,
    ellipsis: Ellipsis,
    state: SearchState,
}

impl Truncator {
    /// Prepare a search, locating the first leaf to edit.
    ///
    /// Locating may prune spent leaves from `tree`.
    pub fn new(
        tree: &mut Tree,
        container: NodeId,
        target_height: f32,
        delimiters: Vec<String>,
        ellipsis: Ellipsis,
    ) -> Self {
        let leaf = locate_last(tree, container, &ellipsis);
        let state = SearchState::new(leaf, &delimiters);
        Self {
            container,
            target_height,
            delimiters,
            ellipsis,
            state,
        }
    }

    pub const fn state(&self) -> &SearchState {
        &self.state
    }

    pub const fn target_height(&self) -> f32 {
        self.target_height
    }

    /// Run one step of the search.
    pub fn step<O: LayoutOracle + ?Sized>(&mut self, tree: &mut Tree, oracle: &O) -> Step {
        self.state.steps += 1;
        let Some(leaf) = self.state.leaf else {
            return self.finish(Finish::Exhausted);
        };

        let value = self
            .ellipsis
            .strip(tree.text(leaf).unwrap_or_default())
            .to_string();

        let mut chunks = if let Some(chunks) = self.state.chunks.take() {
            chunks
        } else {
            self.state.delimiter = self.state.queue.pop_front().unwrap_or_default();
            self.state.pending = None;
            split_chunks(&value, &self.state.delimiter)
                .into_iter()
                .map(str::to_string)
                .collect()
        };

        if chunks.len() <= 1 {
            return self.exhaust(tree, oracle, leaf, &value);
        }

        let pending = chunks.pop().unwrap_or_default();
        let remainder = chunks.join(&self.state.delimiter);
        self.ellipsis.apply(tree, leaf, &remainder);
        let height = oracle.height(tree, self.container);
        trace!(
            step = self.state.steps,
            delimiter = %self.state.delimiter,
            chunks = chunks.len(),
            height,
            target = self.target_height,
            "removed chunk"
        );

        if height > self.target_height {
            self.state.chunks = Some(chunks);
            self.state.pending = Some(pending);
            self.state.phase = SearchPhase::Searching;
            return Step::Continue(SearchPhase::Searching);
        }

        if self.state.queue.is_empty() {
            self.state.chunks = Some(chunks);
            self.state.pending = Some(pending);
            return self.finish(Finish::Fit);
        }

        // Back off one unit so the finer delimiter starts from an overflow.
        let restored = format!("{remainder}{}{pending}", self.state.delimiter);
        self.ellipsis.apply(tree, leaf, &restored);
        self.state.pending = None;
        self.state.phase = SearchPhase::Fits;
        Step::Continue(SearchPhase::Fits)
    }

    fn exhaust<O: LayoutOracle + ?Sized>(
        &mut self,
        tree: &mut Tree,
        oracle: &O,
        leaf: NodeId,
        value: &str,
    ) -> Step {
        if !self.state.delimiter.is_empty() {
            self.state.phase = SearchPhase::ExhaustedGranularity;
            return Step::Continue(SearchPhase::ExhaustedGranularity);
        }

        trace!(leaf = leaf.index(), cleared = value, "leaf exhausted");
        tree.set_text(leaf, String::new());
        let next = locate_last(tree, self.container, &self.ellipsis);
        self.state = SearchState {
            steps: self.state.steps,
            ..SearchState::new(next, &self.delimiters)
        };
        let Some(next) = next else {
            return self.finish(Finish::Exhausted);
        };

        // Content after `next` is gone, so it now ends the visible text.
        let text = self
            .ellipsis
            .strip(tree.text(next).unwrap_or_default())
            .to_string();
        self.ellipsis.apply(tree, next, &text);
        if oracle.height(tree, self.container) <= self.target_height {
            return self.finish(Finish::Fit);
        }
        self.state.phase = SearchPhase::ExhaustedLeaf;
        Step::Continue(SearchPhase::ExhaustedLeaf)
    }

    fn finish(&mut self, finish: Finish) -> Step {
        self.state.phase = SearchPhase::Done;
        Step::Finished(finish)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::CellLayout;

    fn delimiters(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    fn run(tree: &mut Tree, layout: &CellLayout, target: f32, list: &[&str]) -> (Finish, usize) {
        let root = tree.root();
        let mut truncator =
            Truncator::new(tree, root, target, delimiters(list), Ellipsis::default());
        loop {
            if let Step::Finished(finish) = truncator.step(tree, layout) {
                return (finish, truncator.state().steps());
            }
        }
    }

    #[test]
    fn test_word_level_search_stops_on_word_boundary() {
        let mut tree = Tree::from_plain_text("The quick brown fox jumps over the lazy dog");
        let layout = CellLayout::new(36).with_row_height(20.0);
        let (finish, _) = run(&mut tree, &layout, 20.0, &[" "]);
        assert_eq!(finish, Finish::Fit);
        assert_eq!(
            tree.text_content(tree.root()),
            "The quick brown fox jumps over the…"
        );
    }

    #[test]
    fn test_first_step_removes_last_chunk() {
        let mut tree = Tree::from_plain_text("alpha beta gamma delta");
        let root = tree.root();
        let layout = CellLayout::new(10);
        let mut truncator = Truncator::new(&mut tree, root, 1.0, delimiters(&[" "]), Ellipsis::default());
        let step = truncator.step(&mut tree, &layout);
        assert_eq!(step, Step::Continue(SearchPhase::Searching));
        assert_eq!(tree.text_content(root), "alpha beta gamma…");
        assert_eq!(truncator.state().pending(), Some("delta"));
        assert_eq!(truncator.state().delimiter(), " ");
    }

    #[test]
    fn test_fit_with_finer_delimiter_restores_and_refines() {
        let mut tree = Tree::from_plain_text("aaa bbb. ccc ddd");
        let root = tree.root();
        let layout = CellLayout::new(12);
        let mut truncator =
            Truncator::new(&mut tree, root, 1.0, delimiters(&[".", " "]), Ellipsis::default());
        // "aaa bbb…" fits on one row, but " " is still queued
        let step = truncator.step(&mut tree, &layout);
        assert_eq!(step, Step::Continue(SearchPhase::Fits));
        assert_eq!(tree.text_content(root), "aaa bbb. ccc ddd…");
        assert!(truncator.state().chunks().is_none());

        let step = truncator.step(&mut tree, &layout);
        assert_eq!(step, Step::Continue(SearchPhase::Searching));
        assert_eq!(tree.text_content(root), "aaa bbb. ccc…");

        assert_eq!(truncator.step(&mut tree, &layout), Step::Finished(Finish::Fit));
        assert_eq!(tree.text_content(root), "aaa bbb.…");
    }

    #[test]
    fn test_missing_delimiter_exhausts_granularity() {
        let mut tree = Tree::from_plain_text("no sentences here at all");
        let root = tree.root();
        let layout = CellLayout::new(10);
        let mut truncator =
            Truncator::new(&mut tree, root, 1.0, delimiters(&[".", " "]), Ellipsis::default());
        let step = truncator.step(&mut tree, &layout);
        assert_eq!(step, Step::Continue(SearchPhase::ExhaustedGranularity));
        assert_eq!(tree.text_content(root), "no sentences here at all", "no mutation");
        let step = truncator.step(&mut tree, &layout);
        assert_eq!(step, Step::Continue(SearchPhase::Searching));
        assert_eq!(truncator.state().delimiter(), " ");
    }

    #[test]
    fn test_empty_list_truncates_per_character() {
        let mut tree = Tree::from_plain_text("abcdefghijkl");
        let layout = CellLayout::new(6);
        let (finish, steps) = run(&mut tree, &layout, 1.0, &[]);
        assert_eq!(finish, Finish::Fit);
        assert_eq!(tree.text_content(tree.root()), "abcde…");
        assert_eq!(steps, 7);
    }

    #[test]
    fn test_single_long_word_falls_back_to_characters() {
        let mut tree = Tree::from_plain_text("supercalifragilistic");
        let layout = CellLayout::new(8);
        let (finish, _) = run(&mut tree, &layout, 1.0, &[" "]);
        assert_eq!(finish, Finish::Fit);
        assert_eq!(tree.text_content(tree.root()), "superca…");
    }

    #[test]
    fn test_emptied_leaf_moves_to_previous_leaf() {
        let mut tree = Tree::new();
        let root = tree.root();
        let first = tree.append_text(root, "keep this");
        let block = tree.append_element(root);
        tree.set_style(block, "display", "block");
        tree.append_text(block, "xy");
        let layout = CellLayout::new(20);

        let (finish, _) = run(&mut tree, &layout, 1.0, &[]);
        assert_eq!(finish, Finish::Fit);
        assert!(!tree.is_attached(block), "spent element is pruned");
        assert_eq!(tree.text(first), Some("keep this…"));
    }

    #[test]
    fn test_exhaustion_when_nothing_fits() {
        let mut tree = Tree::from_plain_text("abc");
        let layout = CellLayout::new(10);
        let (finish, _) = run(&mut tree, &layout, 0.0, &[" "]);
        assert_eq!(finish, Finish::Exhausted);
        assert_eq!(tree.text_content(tree.root()), "");
        assert!(tree.children(tree.root()).is_empty());
    }

    #[test]
    fn test_only_current_leaf_is_edited() {
        let mut tree = Tree::new();
        let root = tree.root();
        let first = tree.append_text(root, "first leaf ");
        let span = tree.append_element(root);
        let second = tree.append_text(span, "second leaf words");
        let layout = CellLayout::new(22);
        let mut truncator =
            Truncator::new(&mut tree, root, 1.0, delimiters(&[" "]), Ellipsis::default());
        assert_eq!(truncator.state().leaf(), Some(second));
        truncator.step(&mut tree, &layout);
        assert_eq!(tree.text(first), Some("first leaf "));
        assert_eq!(tree.text(second), Some("second leaf…"));
    }

    #[test]
    fn test_queue_resets_on_new_leaf() {
        let mut tree = Tree::new();
        let root = tree.root();
        tree.append_text(root, "one. two three");
        let span = tree.append_element(root);
        tree.append_text(span, "x");
        let layout = CellLayout::new(40);
        let mut truncator =
            Truncator::new(&mut tree, root, 0.5, delimiters(&[".", " "]), Ellipsis::default());
        // "x": "." and " " give one chunk each, then characters empty it.
        for _ in 0..3 {
            truncator.step(&mut tree, &layout);
        }
        assert_eq!(truncator.state().phase(), SearchPhase::ExhaustedLeaf);
        assert_eq!(truncator.state().queued().collect::<Vec<_>>(), vec![".", " "]);
        assert_eq!(tree.text_content(root), "one. two three…");
    }
}
