use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::event::Event;
use crate::fs::listing::{DirectoryLister, ListingCache};
use crate::fs::tree::{NavOutcome, TreeNavigator};
use crate::panel::OutputPanel;
use crate::shell::{CommandResult, CommandRunner};
use crate::theme::{self, ThemeColors};

/// Maximum length of the pending command.
pub const COMMAND_CHAR_LIMIT: usize = 256;

/// Top-level interaction mode; decides where key input is routed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    CommandEntry,
    TreeNavigation,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::CommandEntry => "COMMAND",
            Mode::TreeNavigation => "TREE",
        }
    }
}

/// Single-line command editor.
#[derive(Debug, Default)]
pub struct CommandLine {
    input: String,
}

impl CommandLine {
    pub fn as_str(&self) -> &str {
        &self.input
    }

    pub fn push(&mut self, c: char) {
        if self.input.chars().count() < COMMAND_CHAR_LIMIT {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn clear(&mut self) {
        self.input.clear();
    }

    /// Take the buffer, leaving it empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.input)
    }
}

/// Session controller: owns the navigator, output panel and command line.
pub struct App {
    pub mode: Mode,
    pub navigator: TreeNavigator,
    pub output: OutputPanel,
    pub command_line: CommandLine,
    pub theme: ThemeColors,
    /// Commands submitted whose result has not arrived yet.
    pub pending_commands: usize,
    pub should_quit: bool,
    runner: CommandRunner,
}

impl App {
    /// Build the session from config; command results are posted to `tx`.
    pub fn new(config: &AppConfig, tx: mpsc::UnboundedSender<Event>) -> Result<Self> {
        let root = config.root();
        let cache = ListingCache::new(config.cache_ttl());
        let lister = DirectoryLister::disk(cache, config.show_hidden());
        let navigator = TreeNavigator::new(&root, lister, config.open_options())
            .map_err(|e| AppError::InvalidPath(format!("{}: {}", root.display(), e)))?;
        let runner = CommandRunner::new(config.shell(), tx);
        Ok(Self::with_parts(
            navigator,
            runner,
            theme::resolve_theme(&config.theme),
        ))
    }

    pub fn with_parts(navigator: TreeNavigator, runner: CommandRunner, theme: ThemeColors) -> Self {
        Self {
            mode: Mode::default(),
            navigator,
            output: OutputPanel::default(),
            command_line: CommandLine::default(),
            theme,
            pending_commands: 0,
            should_quit: false,
            runner,
        }
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Echo the pending command, dispatch it and clear the editor.
    ///
    /// Whitespace-only input is discarded without touching the panel.
    pub fn submit_command(&mut self) {
        let input = self.command_line.take();
        if input.trim().is_empty() {
            return;
        }
        self.output.append(&format!("\n> {input}"));
        self.output.scroll_to_bottom();
        self.runner.run(&input);
        self.pending_commands += 1;
    }

    /// Merge a finished command into the panel.
    pub fn handle_command_result(&mut self, result: CommandResult) {
        self.pending_commands = self.pending_commands.saturating_sub(1);
        debug!(id = result.id, command = %result.input, "command result");
        match result.error {
            Some(err) => self.output.append(&format!("Error: {err}")),
            None if !result.output.is_empty() => self.output.append(&result.output),
            None => {}
        }
        self.output.scroll_to_bottom();
    }

    /// Apply the outcome of a navigator key.
    pub fn handle_nav_outcome(&mut self, outcome: Result<NavOutcome>) {
        match outcome {
            Ok(NavOutcome::Opened(opened)) => match opened.read_content() {
                Ok(content) => {
                    self.output.set_content(&content);
                    self.output.scroll_to_bottom();
                }
                Err(e) => self.report_error(&e),
            },
            Ok(NavOutcome::Quit) => self.quit(),
            Ok(NavOutcome::Descended(id) | NavOutcome::Ascended(id)) => {
                debug!(node = ?id, "moved")
            }
            Ok(NavOutcome::Idle) => {}
            Err(e) => self.report_error(&e),
        }
    }

    /// Surface a failure as an `Error:` line.
    pub fn report_error(&mut self, err: &AppError) {
        warn!(error = %err, "surfacing error");
        self.output.append(&format!("Error: {err}"));
        self.output.scroll_to_bottom();
    }

    pub fn page_up(&mut self) {
        let page = self.output.viewport_height() as isize;
        self.output.scroll_by(-page);
    }

    pub fn page_down(&mut self) {
        let page = self.output.viewport_height() as isize;
        self.output.scroll_by(page);
    }

    pub fn log_exit(&self) {
        info!(pending = self.pending_commands, "session ended");
    }
}
