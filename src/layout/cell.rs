//! Fixed-width terminal layout.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use super::LayoutOracle;
use crate::tree::{NodeId, Tree};

/// Style properties inherited from ancestors when not set on the element.
const INHERITED: &[&str] = &["line-height", "font-size"];

/// Lays text out in rows of terminal cells.
///
/// Text flows inline through the tree in document order. Elements styled
/// `display: block` start on a new row, `display: none` hides a subtree,
/// and `\n` inside text forces a break. Rows wrap at whitespace; words
/// wider than a row are broken between grapheme clusters.
///
/// # Example
///
/// ```
/// use lineclamp::layout::{CellLayout, LayoutOracle};
/// use lineclamp::tree::Tree;
///
/// let tree = Tree::from_plain_text("one two three");
/// let layout = CellLayout::new(8);
/// assert_eq!(layout.rows(&tree, tree.root()), vec!["one two", "three"]);
/// assert_eq!(layout.height(&tree, tree.root()), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CellLayout {
    width: usize,
    row_height: f32,
    native_clamp: bool,
}

impl CellLayout {
    /// Create a layout `width` cells wide with one-pixel rows.
    pub fn new(width: u16) -> Self {
        Self {
            width: usize::from(width.max(1)),
            row_height: 1.0,
            native_clamp: false,
        }
    }

    /// Report each row as `row_height` tall.
    #[must_use]
    pub const fn with_row_height(mut self, row_height: f32) -> Self {
        self.row_height = row_height;
        self
    }

    /// Advertise native line clamping to the clamp engine.
    #[must_use]
    pub const fn with_native_clamp(mut self, native_clamp: bool) -> Self {
        self.native_clamp = native_clamp;
        self
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn row_height(&self) -> f32 {
        self.row_height
    }

    /// Wrapped rows of `element`, ignoring any line clamp style.
    pub fn rows(&self, tree: &Tree, element: NodeId) -> Vec<String> {
        let mut rows = Vec::new();
        for paragraph in paragraphs(tree, element) {
            wrap_paragraph(&paragraph, self.width, &mut rows);
        }
        rows
    }

    /// Rows as displayed, honoring `-webkit-line-clamp` on `element`.
    pub fn render(&self, tree: &Tree, element: NodeId) -> Vec<String> {
        let mut rows = self.rows(tree, element);
        let Some(limit) = tree
            .style(element, "-webkit-line-clamp")
            .and_then(|value| value.trim().parse::<usize>().ok())
        else {
            return rows;
        };
        if rows.len() > limit {
            rows.truncate(limit);
            if let Some(last) = rows.last_mut() {
                *last = fit_with_suffix(last, self.width, "…");
            }
        }
        rows
    }
}

impl LayoutOracle for CellLayout {
    fn height(&self, tree: &Tree, element: NodeId) -> f32 {
        let rows = self.render(tree, element).len();
        #[allow(clippy::cast_precision_loss)]
        {
            rows as f32 * self.row_height
        }
    }

    fn computed_style(&self, tree: &Tree, element: NodeId, property: &str) -> Option<String> {
        let inherited = INHERITED.contains(&property);
        let mut current = Some(element);
        while let Some(id) = current {
            if let Some(value) = tree.style(id, property) {
                return Some(value.to_string());
            }
            if !inherited {
                break;
            }
            current = tree.parent(id);
        }
        match property {
            "line-height" | "font-size" => Some(format!("{}px", self.row_height)),
            _ => None,
        }
    }

    fn supports_native_clamp(&self) -> bool {
        self.native_clamp
    }
}

/// Split the inline flow of `element` into paragraphs at block and hard breaks.
fn paragraphs(tree: &Tree, element: NodeId) -> Vec<String> {
    enum Item {
        Node(NodeId),
        BlockEnd,
    }

    let mut out = vec![String::new()];
    let mut stack: Vec<Item> = tree
        .children(element)
        .iter()
        .rev()
        .map(|child| Item::Node(*child))
        .collect();

    while let Some(item) = stack.pop() {
        let id = match item {
            Item::BlockEnd => {
                break_soft(&mut out);
                continue;
            }
            Item::Node(id) => id,
        };
        if let Some(text) = tree.text(id) {
            for (idx, part) in text.split('\n').enumerate() {
                if idx > 0 {
                    out.push(String::new());
                }
                if let Some(last) = out.last_mut() {
                    last.push_str(part);
                }
            }
            continue;
        }
        match tree.style(id, "display") {
            Some("none") => continue,
            Some("block") => {
                break_soft(&mut out);
                stack.push(Item::BlockEnd);
            }
            _ => {}
        }
        stack.extend(tree.children(id).iter().rev().map(|child| Item::Node(*child)));
    }

    if out.last().is_some_and(String::is_empty) {
        out.pop();
    }
    out
}

fn break_soft(out: &mut Vec<String>) {
    if out.last().is_some_and(|last| !last.is_empty()) {
        out.push(String::new());
    }
}

/// Split text into alternating runs of whitespace and non-whitespace.
fn split_tokens(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut ws_state: Option<bool> = None;
    for (idx, ch) in text.char_indices() {
        let is_ws = ch.is_whitespace();
        match ws_state {
            Some(state) if state != is_ws => {
                out.push(&text[start..idx]);
                start = idx;
                ws_state = Some(is_ws);
            }
            Some(_) => {}
            None => ws_state = Some(is_ws),
        }
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

fn wrap_paragraph(paragraph: &str, width: usize, rows: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_len = 0usize;
    let mut has_word = false;

    let mut flush = |current: &mut String, current_len: &mut usize, has_word: &mut bool| {
        rows.push(current.trim_end().to_string());
        current.clear();
        *current_len = 0;
        *has_word = false;
    };

    for token in split_tokens(paragraph) {
        let token_len = token.width();
        let token_is_ws = token.chars().all(char::is_whitespace);

        if current_len + token_len > width && has_word {
            flush(&mut current, &mut current_len, &mut has_word);
        }

        if token_is_ws {
            // Drop leading whitespace at wrapped line starts.
            if has_word {
                current.push_str(token);
                current_len += token_len;
            }
            continue;
        }

        if token_len <= width {
            current.push_str(token);
            current_len += token_len;
            has_word = true;
            continue;
        }

        for grapheme in token.graphemes(true) {
            let grapheme_len = grapheme.width();
            if current_len + grapheme_len > width && current_len > 0 {
                flush(&mut current, &mut current_len, &mut has_word);
            }
            current.push_str(grapheme);
            current_len += grapheme_len;
            has_word = true;
        }
    }

    flush(&mut current, &mut current_len, &mut has_word);
}

/// Cut `row` so that it plus `suffix` fits in `width` cells.
fn fit_with_suffix(row: &str, width: usize, suffix: &str) -> String {
    let target = width.saturating_sub(suffix.width());
    let mut out = String::with_capacity(row.len() + suffix.len());
    let mut used = 0usize;
    for grapheme in row.graphemes(true) {
        let grapheme_len = grapheme.width();
        if used + grapheme_len > target {
            break;
        }
        out.push_str(grapheme);
        used += grapheme_len;
    }
    out.truncate(out.trim_end().len());
    out.push_str(suffix);
    out
}
