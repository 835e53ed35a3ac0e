// Handlers - key routing and action dispatch

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::Backend;

use super::{App, FocusArea};
use crate::action::Action;
use crate::chat::{NavKey, Rejection, SubmitOutcome};
use crate::components::Component;

impl<B: Backend> App<B> {
    /// Keys that work regardless of focus
    fn global_key(&self, key: KeyEvent) -> Option<Action> {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) | (KeyModifiers::CONTROL, KeyCode::Char('q')) => {
                Some(Action::Quit)
            }
            (KeyModifiers::CONTROL, KeyCode::Char('l')) => Some(Action::ToggleLanguage),
            (_, KeyCode::Tab) | (_, KeyCode::BackTab) => Some(Action::FocusNext),
            (_, KeyCode::PageUp) => Some(Action::ScrollPageUp),
            (_, KeyCode::PageDown) => Some(Action::ScrollPageDown),
            (KeyModifiers::CONTROL, KeyCode::Home) => Some(Action::ScrollToTop),
            (KeyModifiers::CONTROL, KeyCode::End) => Some(Action::ScrollToBottom),
            _ => None,
        }
    }

    pub(super) fn handle_event(&mut self, event: Event) -> Option<Action> {
        match &event {
            Event::Key(key) => {
                // Only handle key press events, not release
                if key.kind != KeyEventKind::Press {
                    return None;
                }
                if let Some(action) = self.global_key(*key) {
                    return Some(action);
                }
            }
            Event::Mouse(_) => return self.viewer.handle_event(&event),
            Event::Resize(_, _) => return Some(Action::Render),
            Event::Paste(_) => return self.chat_input.handle_event(&event),
            _ => return None,
        }

        match self.focus {
            FocusArea::Input => {
                // Up/Down belong to the suggestion list only while it is showing
                if let Event::Key(key) = &event {
                    let arrow = matches!(key.code, KeyCode::Up | KeyCode::Down);
                    if arrow && key.modifiers == KeyModifiers::NONE && !self.session.suggestions().is_visible() {
                        return self.viewer.handle_event(&event);
                    }
                }
                self.chat_input.handle_event(&event)
            }
            FocusArea::Chips => self
                .chips
                .handle_event(&event)
                .or_else(|| self.viewer.handle_event(&event)),
        }
    }

    pub(super) fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => {
                tracing::info!("Quit requested");
                self.should_quit = true;
            }
            Action::Tick => {
                if self.toasts.tick() {
                    self.mark_dirty();
                }
                if self.session.is_pending() && self.viewer.tick_spinner() {
                    self.mark_dirty();
                }
            }
            Action::Render => self.mark_dirty(),
            Action::FocusNext => {
                self.focus = self.focus.next();
                self.mark_dirty();
            }
            Action::ScrollUp(_)
            | Action::ScrollDown(_)
            | Action::ScrollPageUp
            | Action::ScrollPageDown
            | Action::ScrollToTop
            | Action::ScrollToBottom => {
                self.viewer.update(&action);
                self.session.update_viewport(self.viewer.metrics());
                self.mark_dirty();
            }
            Action::InputChanged(text) => self.session.on_input_change(text),
            Action::Nav(NavKey::Escape) if !self.session.suggestions().is_visible() => {
                self.dispatch(Action::DismissNotice);
            }
            Action::Nav(key) => {
                if let Some(outcome) = self.session.on_key(key) {
                    self.after_submit(outcome);
                }
            }
            Action::ChipPrev | Action::ChipNext => {
                self.chips.update(&action);
                self.mark_dirty();
            }
            Action::Submit(text) => {
                let outcome = self.session.on_submit(&text);
                self.after_submit(outcome);
            }
            Action::ToggleLanguage => {
                self.session.toggle_language();
            }
            Action::DismissNotice => {
                if self.toasts.has_toasts() {
                    self.toasts.dismiss_first();
                    self.mark_dirty();
                }
            }
            Action::None => {}
        }

        self.sync_from_session();
    }

    fn after_submit(&mut self, outcome: SubmitOutcome) {
        match outcome {
            SubmitOutcome::Accepted { request } => {
                tracing::debug!("Request {} dispatched", request);
                self.viewer.reset_spinner();
                self.chat_input.clear();
            }
            SubmitOutcome::Rejected(Rejection::Offline) => tracing::debug!("Submit rejected: server offline"),
            SubmitOutcome::Rejected(Rejection::Busy) => tracing::debug!("Submit rejected: reply pending"),
            SubmitOutcome::Ignored => {}
        }
        self.mark_dirty();
    }
}
