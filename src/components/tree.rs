use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::fs::listing::EntryKind;
use crate::fs::tree::TreeNavigator;
use crate::theme::ThemeColors;

/// Key hints drawn above the listing.
pub const INSTRUCTIONS: [&str; 4] = [
    "use arrow keys to navigate",
    "use enter to open a directory or file",
    "use left/ESC to go back, right for commands",
    "use Ctrl+C to exit",
];

/// Rows taken by the instructions plus a spacer line.
pub const HEADER_HEIGHT: u16 = INSTRUCTIONS.len() as u16 + 1;

/// Widget that renders the current directory of the navigator.
pub struct TreeWidget<'a> {
    navigator: &'a TreeNavigator,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(navigator: &'a TreeNavigator, theme: &'a ThemeColors) -> Self {
        Self {
            navigator,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    fn entry_style(&self, kind: EntryKind) -> Style {
        match kind {
            EntryKind::Directory => Style::default()
                .fg(self.theme.dir_fg)
                .add_modifier(Modifier::BOLD),
            EntryKind::File => Style::default().fg(self.theme.file_fg),
            EntryKind::Executable => Style::default()
                .fg(self.theme.exec_fg)
                .add_modifier(Modifier::ITALIC),
        }
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let hint_style = Style::default().fg(self.theme.dim_fg);
        for (i, hint) in INSTRUCTIONS.iter().enumerate() {
            if i as u16 >= inner.height {
                return;
            }
            buf.set_line(
                inner.x,
                inner.y + i as u16,
                &Line::from(Span::styled(*hint, hint_style)),
                inner.width,
            );
        }

        let list_height = inner.height.saturating_sub(HEADER_HEIGHT) as usize;
        let list_top = inner.y + HEADER_HEIGHT;
        let listing = &self.navigator.current().listing;
        let cursor = self.navigator.cursor();

        let visible = listing
            .items()
            .enumerate()
            .skip(self.navigator.scroll_offset)
            .take(list_height);

        for (row, (idx, (kind, name))) in visible.enumerate() {
            let prefix = match kind {
                EntryKind::Directory => "|--",
                EntryKind::File | EntryKind::Executable => "|-",
            };
            let mut style = self.entry_style(kind);
            if idx == cursor {
                style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
            }
            let line = Line::from(vec![Span::raw(prefix), Span::styled(name, style)]);
            buf.set_line(inner.x, list_top + row as u16, &line, inner.width);
        }
    }
}
