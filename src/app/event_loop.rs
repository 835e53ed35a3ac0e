// Event loop - async run() over terminal input, session events and the tick timer

use crossterm::event::EventStream;
use futures::StreamExt;
use ratatui::backend::Backend;
use tokio::time::MissedTickBehavior;

use super::App;
use crate::action::Action;
use crate::chat::SessionEvent;
use crate::error::{ChatError, Result};

impl<B: Backend> App<B> {
    pub async fn run(&mut self) -> Result<()> {
        self.session.mount();
        tracing::info!("Chat session started");

        let mut events = EventStream::new();
        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.draw()?;
        self.needs_redraw = false;

        loop {
            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(event)) => {
                        // Any user input implies we want to give UI feedback
                        self.mark_dirty();
                        if let Some(action) = self.handle_event(event) {
                            self.dispatch(action);
                        }
                    }
                    Some(Err(e)) => return Err(ChatError::Terminal(e.to_string())),
                    None => {
                        tracing::warn!("Terminal event stream ended");
                        break;
                    }
                },
                Some(event) = self.session.next_event() => {
                    self.apply_session_event(event);
                }
                _ = ticker.tick() => {
                    self.dispatch(Action::Tick);
                }
            }

            if self.should_quit {
                break;
            }

            if self.needs_redraw {
                self.draw()?;
                self.needs_redraw = false;
            }
        }

        self.session.unmount();
        tracing::info!("Chat session ended");
        Ok(())
    }

    /// Apply one background event plus anything queued behind it
    pub(super) fn apply_session_event(&mut self, event: SessionEvent) {
        let waited = self.session.pending_for();
        self.session.handle_event(event);
        self.session.drain_events();
        if let (Some(waited), false) = (waited, self.session.is_pending()) {
            tracing::debug!(elapsed_ms = waited.as_millis() as u64, "Reply settled");
            self.viewer.reset_spinner();
        }
        self.sync_from_session();
        self.mark_dirty();
    }
}
