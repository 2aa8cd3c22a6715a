use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

use crate::error::{AppError, Result};
use crate::shell::CommandResult;

/// Everything the main loop reacts to, from the terminal or from background commands.
#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    /// No terminal input within one tick; the loop just redraws.
    Tick,
    Resize(u16, u16),
    /// Posted by the command runner when a submitted command exits.
    CommandComplete(CommandResult),
}

/// Map a raw terminal event to a loop event. Key releases, mouse and focus
/// events are dropped.
fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => Some(Event::Key(key)),
        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}

/// Single queue feeding the main loop.
///
/// A background task polls the terminal; clones of [`sender`](Self::sender)
/// let the command runner post `CommandComplete` on the same queue.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Start polling the terminal, emitting `Tick` after each idle `tick_rate`.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let poll_tx = tx.clone();

        tokio::spawn(async move {
            loop {
                let next = match event::poll(tick_rate) {
                    Ok(true) => match event::read() {
                        Ok(raw) => translate(raw),
                        Err(_) => None,
                    },
                    Ok(false) | Err(_) => Some(Event::Tick),
                };
                if let Some(ev) = next {
                    if poll_tx.send(ev).is_err() {
                        break;
                    }
                }
            }
        });

        Self { rx, tx }
    }

    /// Handle for producers outside the terminal poller.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Wait for the next event in arrival order.
    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| AppError::Terminal("event channel closed".into()))
    }
}
