mod app;
mod components;
mod config;
mod error;
mod event;
mod fs;
mod handler;
mod panel;
mod shell;
mod theme;
mod tui;
mod ui;

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::AppConfig;
use crate::event::{Event, EventHandler};
use crate::tui::{install_panic_hook, TerminalSession};

/// A terminal file browser with an embedded shell-command panel.
#[derive(Parser, Debug)]
#[command(name = "explorer", version, about)]
struct Cli {
    /// Explicit config file (highest priority)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs here instead of `<temp dir>/explorer.log`
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Log to a file; the terminal itself is owned by the UI.
fn init_tracing(path: &Path) {
    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
    {
        Ok(f) => f,
        Err(_) => return,
    };
    let filter =
        EnvFilter::try_from_env("EXPLORER_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("explorer.log"));
    init_tracing(&log_path);

    let config = AppConfig::load(cli.config.as_deref());
    let mut events = EventHandler::new(Duration::from_millis(100));
    let mut app = App::new(&config, events.sender())?;
    info!(root = %config.root().display(), "session started");

    install_panic_hook();
    let mut session = TerminalSession::enter()?;

    loop {
        session.draw(|frame| ui::render(&mut app, frame))?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::CommandComplete(result) => app.handle_command_result(result),
            Event::Resize(width, height) => debug!(width, height, "terminal resized"),
            Event::Tick => {}
        }

        if app.should_quit {
            break;
        }
    }

    session.restore()?;
    app.log_exit();
    Ok(())
}
