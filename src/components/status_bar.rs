use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::app::Mode;
use crate::theme::ThemeColors;

/// Status bar widget: active mode, current directory and key hints.
pub struct StatusBarWidget<'a> {
    mode: Mode,
    path_str: &'a str,
    theme: &'a ThemeColors,
    pending_commands: usize,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(mode: Mode, path_str: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            mode,
            path_str,
            theme,
            pending_commands: 0,
        }
    }

    pub fn pending_commands(mut self, count: usize) -> Self {
        self.pending_commands = count;
        self
    }

    fn key_hints(&self) -> &'static str {
        match self.mode {
            Mode::CommandEntry => " enter:run  ←/esc:tree  pgup/pgdn:scroll  ^c:quit ",
            Mode::TreeNavigation => " ↑↓:move  enter:open  ←:back  →:command  ^c:quit ",
        }
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;
        let base = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.status_fg);

        let mode_label = format!(" {} ", self.mode.label());
        let mode_style = Style::default()
            .bg(self.theme.border_focused_fg)
            .fg(self.theme.status_bg)
            .add_modifier(Modifier::BOLD);

        let running = if self.pending_commands > 0 {
            format!(" running {} ", self.pending_commands)
        } else {
            String::new()
        };

        let key_hints = self.key_hints();
        let hints_len = key_hints.chars().count();
        let fixed = mode_label.len() + running.len() + hints_len + 1;

        // Truncate the path from the left so its tail stays visible.
        let path_budget = width.saturating_sub(fixed);
        let path_len = self.path_str.chars().count();
        let path_display: String = if path_len > path_budget {
            if path_budget > 3 {
                let tail: String = self
                    .path_str
                    .chars()
                    .skip(path_len - (path_budget - 3))
                    .collect();
                format!("...{tail}")
            } else {
                String::new()
            }
        } else {
            self.path_str.to_string()
        };

        let used = mode_label.len() + 1 + path_display.chars().count() + running.len();
        let gap = width.saturating_sub(used).saturating_sub(hints_len);

        let line = Line::from(vec![
            Span::styled(mode_label, mode_style),
            Span::styled(" ", base),
            Span::styled(path_display, base),
            Span::styled(
                running,
                base.fg(self.theme.prompt_fg).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ".repeat(gap), base),
            Span::styled(key_hints, base.fg(self.theme.dim_fg)),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
