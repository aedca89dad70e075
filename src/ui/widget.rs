use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::layout::CellLayout;
use crate::tree::{NodeId, Tree};

/// Renders a content tree laid out by [`CellLayout`] at the area's width.
///
/// Rows beyond the area are cut off; a `-webkit-line-clamp` style on the
/// container is honored.
#[derive(Debug, Clone)]
pub struct ClampedText<'a> {
    tree: &'a Tree,
    container: NodeId,
    style: Style,
    block: Option<Block<'a>>,
}

impl<'a> ClampedText<'a> {
    pub fn new(tree: &'a Tree, container: NodeId) -> Self {
        Self {
            tree,
            container,
            style: Style::default(),
            block: None,
        }
    }

    #[must_use]
    pub const fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for ClampedText<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = self.block.as_ref().map_or(area, |block| block.inner(area));
        let rows: Vec<Line> = CellLayout::new(inner.width)
            .render(self.tree, self.container)
            .into_iter()
            .map(Line::from)
            .collect();
        let mut paragraph = Paragraph::new(rows).style(self.style);
        if let Some(block) = self.block {
            paragraph = paragraph.block(block);
        }
        paragraph.render(area, buf);
    }
}
