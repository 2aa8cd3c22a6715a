use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::theme::ThemeColors;

const PROMPT: &str = "> ";
const PLACEHOLDER: &str = "Enter command...";

/// Single-line command editor widget.
pub struct CommandLineWidget<'a> {
    input: &'a str,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> CommandLineWidget<'a> {
    pub fn new(input: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            input,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    /// Column of the text cursor relative to the inner area, scrolled so the
    /// end of the input stays visible.
    pub fn cursor_column(input: &str, inner_width: u16) -> u16 {
        let len = (PROMPT.len() + input.chars().count()) as u16;
        len.min(inner_width.saturating_sub(1))
    }
}

impl<'a> Widget for CommandLineWidget<'a> {
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

        let prompt = Span::styled(
            PROMPT,
            Style::default()
                .fg(self.theme.prompt_fg)
                .add_modifier(Modifier::BOLD),
        );
        let line = if self.input.is_empty() {
            Line::from(vec![
                prompt,
                Span::styled(PLACEHOLDER, Style::default().fg(self.theme.dim_fg)),
            ])
        } else {
            // Keep the tail visible when the input is wider than the field.
            let room = (inner.width as usize).saturating_sub(PROMPT.len() + 1);
            let count = self.input.chars().count();
            let visible: String = self.input.chars().skip(count.saturating_sub(room)).collect();
            Line::from(vec![
                prompt,
                Span::styled(visible, Style::default().fg(self.theme.output_fg)),
            ])
        };
        buf.set_line(inner.x, inner.y, &line, inner.width);
    }
}
