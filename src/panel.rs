//! Scrollable output buffer shared by file opens and command results.

/// Initial viewport before the first layout pass.
pub const DEFAULT_VIEWPORT_HEIGHT: usize = 20;
pub const DEFAULT_VIEWPORT_WIDTH: usize = 80;

/// Line-structured output panel with a clamped scroll offset.
///
/// Every mutation ends by re-clamping `scroll_offset` into
/// `[0, max(0, lines - viewport_height)]`.
#[derive(Debug, Clone)]
pub struct OutputPanel {
    lines: Vec<String>,
    scroll_offset: usize,
    viewport_height: usize,
    viewport_width: usize,
}

impl Default for OutputPanel {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            scroll_offset: 0,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
        }
    }
}

impl OutputPanel {
    #[allow(dead_code)]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The panel content joined back into a single string.
    #[allow(dead_code)]
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    #[allow(dead_code)]
    pub fn viewport_width(&self) -> usize {
        self.viewport_width
    }

    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.viewport_height)
    }

    fn clamp(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_offset());
    }

    /// Replace the whole content.
    pub fn set_content(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        self.clamp();
    }

    /// Equivalent to `set_content(content() + "\n" + text)`, kept as a line log.
    pub fn append(&mut self, text: &str) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.lines.extend(text.split('\n').map(str::to_string));
        self.clamp();
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta);
        self.clamp();
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_offset();
    }

    pub fn resize(&mut self, height: usize, width: usize) {
        self.viewport_height = height;
        self.viewport_width = width;
        self.clamp();
    }

    /// Lines currently inside the viewport.
    pub fn visible_lines(&self) -> &[String] {
        let end = (self.scroll_offset + self.viewport_height).min(self.lines.len());
        &self.lines[self.scroll_offset..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel_with(lines: usize, height: usize) -> OutputPanel {
        let mut panel = OutputPanel::default();
        panel.resize(height, 80);
        let text: Vec<String> = (0..lines).map(|i| format!("line {i}")).collect();
        panel.set_content(&text.join("\n"));
        panel
    }

    #[test]
    fn set_content_replaces() {
        let mut panel = OutputPanel::default();
        panel.append("old");
        panel.set_content("hello");
        assert_eq!(panel.content(), "hello");
        assert_eq!(panel.total_lines(), 1);
    }

    #[test]
    fn append_matches_string_concatenation() {
        let mut panel = OutputPanel::default();
        panel.append("\n> echo hi");
        assert_eq!(panel.content(), "\n\n> echo hi");
        panel.append("hi");
        assert_eq!(panel.content(), "\n\n> echo hi\nhi");
    }

    #[test]
    fn append_after_set_content_keeps_history() {
        let mut panel = OutputPanel::default();
        panel.set_content("a\nb");
        panel.append("c");
        assert_eq!(panel.lines(), ["a", "b", "c"]);
    }

    #[test]
    fn scroll_by_clamps_both_ends() {
        let mut panel = panel_with(30, 10);
        panel.scroll_by(-5);
        assert_eq!(panel.scroll_offset(), 0);
        panel.scroll_by(100);
        assert_eq!(panel.scroll_offset(), 20);
        panel.scroll_by(-3);
        assert_eq!(panel.scroll_offset(), 17);
    }

    #[test]
    fn short_content_never_scrolls() {
        let mut panel = panel_with(3, 10);
        panel.scroll_by(5);
        assert_eq!(panel.scroll_offset(), 0);
        panel.scroll_to_bottom();
        assert_eq!(panel.scroll_offset(), 0);
    }

    #[test]
    fn top_and_bottom() {
        let mut panel = panel_with(25, 10);
        panel.scroll_to_bottom();
        assert_eq!(panel.scroll_offset(), 15);
        assert_eq!(panel.visible_lines().last().unwrap(), "line 24");
        panel.scroll_to_top();
        assert_eq!(panel.scroll_offset(), 0);
    }

    #[test]
    fn shrinking_content_reclamps() {
        let mut panel = panel_with(40, 10);
        panel.scroll_to_bottom();
        panel.set_content("one\ntwo");
        assert_eq!(panel.scroll_offset(), 0);
    }

    #[test]
    fn growing_viewport_reclamps() {
        let mut panel = panel_with(30, 10);
        panel.scroll_to_bottom();
        panel.resize(25, 80);
        assert_eq!(panel.scroll_offset(), 5);
        panel.resize(40, 80);
        assert_eq!(panel.scroll_offset(), 0);
    }

    #[test]
    fn resize_records_width() {
        let mut panel = OutputPanel::default();
        panel.resize(7, 33);
        assert_eq!(panel.viewport_height(), 7);
        assert_eq!(panel.viewport_width(), 33);
    }

    #[test]
    fn visible_lines_window() {
        let mut panel = panel_with(12, 5);
        panel.scroll_by(3);
        assert_eq!(panel.visible_lines().len(), 5);
        assert_eq!(panel.visible_lines()[0], "line 3");
    }
}
