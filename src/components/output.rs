use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::panel::OutputPanel;
use crate::theme::ThemeColors;

const TAB_WIDTH: usize = 4;

/// Widget that renders the visible window of the output panel.
pub struct OutputWidget<'a> {
    panel: &'a OutputPanel,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> OutputWidget<'a> {
    pub fn new(panel: &'a OutputPanel, theme: &'a ThemeColors) -> Self {
        Self {
            panel,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    fn line_style(&self, line: &str) -> Style {
        if line.starts_with("> ") {
            Style::default()
                .fg(self.theme.prompt_fg)
                .add_modifier(Modifier::BOLD)
        } else if line.starts_with("Error: ") {
            Style::default().fg(self.theme.error_fg)
        } else {
            Style::default().fg(self.theme.output_fg)
        }
    }
}

impl<'a> Widget for OutputWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = self.block.as_ref() {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        for (i, text) in self
            .panel
            .visible_lines()
            .iter()
            .take(inner.height as usize)
            .enumerate()
        {
            let expanded = text.replace('\t', &" ".repeat(TAB_WIDTH));
            let line = Line::from(Span::styled(expanded, self.line_style(text)));
            buf.set_line(inner.x, inner.y + i as u16, &line, inner.width);
        }
    }
}
