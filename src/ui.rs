use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, Mode};
use crate::components::command_line::CommandLineWidget;
use crate::components::output::OutputWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::{TreeWidget, HEADER_HEIGHT};
use crate::panel::OutputPanel;

/// Screen regions for one frame.
struct Panes {
    tree: Rect,
    output: Rect,
    command: Rect,
    status: Rect,
}

fn split(area: Rect) -> Panes {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(columns[1]);
    Panes {
        tree: columns[0],
        output: right[0],
        command: right[1],
        status: rows[1],
    }
}

/// Output title with the visible line range, e.g. ` Output 1-20/57 `.
fn output_title(panel: &OutputPanel) -> String {
    let total = panel.total_lines();
    if total == 0 {
        return " Output ".to_string();
    }
    let first = panel.scroll_offset() + 1;
    let last = (panel.scroll_offset() + panel.viewport_height()).min(total);
    format!(" Output {first}-{last}/{total} ")
}

/// Render the tree beside the stacked output panel and command line.
pub fn render(app: &mut App, frame: &mut Frame) {
    let panes = split(frame.area());
    let theme = app.theme.clone();

    let border = |focused: bool| {
        let fg = if focused {
            theme.border_focused_fg
        } else {
            theme.border_fg
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(fg))
    };
    let tree_focused = app.mode == Mode::TreeNavigation;

    // Sync viewport sizes before drawing so scroll clamps use this frame's layout.
    let tree_title = format!(" {} ", app.navigator.current().listing.path.display());
    let tree_block = border(tree_focused).title(tree_title);
    let tree_inner = tree_block.inner(panes.tree);
    app.navigator
        .update_scroll(tree_inner.height.saturating_sub(HEADER_HEIGHT) as usize);

    let output_area = border(false).inner(panes.output);
    app.output
        .resize(output_area.height as usize, output_area.width as usize);
    let output_block = border(false).title(output_title(&app.output));

    frame.render_widget(
        TreeWidget::new(&app.navigator, &theme).block(tree_block),
        panes.tree,
    );
    frame.render_widget(
        OutputWidget::new(&app.output, &theme).block(output_block),
        panes.output,
    );

    let command_block = border(!tree_focused).title(" Command ");
    let command_inner = command_block.inner(panes.command);
    frame.render_widget(
        CommandLineWidget::new(app.command_line.as_str(), &theme).block(command_block),
        panes.command,
    );
    if !tree_focused && command_inner.width > 0 && command_inner.height > 0 {
        let col = CommandLineWidget::cursor_column(app.command_line.as_str(), command_inner.width);
        frame.set_cursor_position(Position::new(command_inner.x + col, command_inner.y));
    }

    let path = app.navigator.current().listing.path.display().to_string();
    frame.render_widget(
        StatusBarWidget::new(app.mode, &path, &theme).pending_commands(app.pending_commands),
        panes.status,
    );
}
