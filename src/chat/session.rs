//! The conversation controller.
//!
//! [`ChatSession`] owns the transcript, the dispatcher, the suggestion list,
//! the health monitor and the scroll coordinator. Background tasks never touch
//! that state directly: they post [`SessionEvent`]s to the session's queue and
//! the UI loop feeds them back through [`ChatSession::handle_event`].

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::dispatcher::{DispatchContext, MessageDispatcher, Rejection, SubmitOutcome};
use super::events::{Notice, SessionEvent};
use super::health::{HealthMonitor, DEFAULT_HEALTH_INTERVAL, DEFAULT_CHECK_TIMEOUT};
use super::language::{Language, UiCopy};
use super::message::{Message, Origin};
use super::scroll::{ScrollCoordinator, ViewportMetrics, DEFAULT_NEAR_BOTTOM_THRESHOLD};
use super::store::ConversationStore;
use super::suggestions::{EnterAction, SuggestionList};
use crate::api::ChatBackend;

/// Keys the presentation forwards while the input has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Enter,
    Escape,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub language: Language,
    pub health_interval: Duration,
    pub check_timeout: Duration,
    pub scroll_threshold: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            health_interval: DEFAULT_HEALTH_INTERVAL,
            check_timeout: DEFAULT_CHECK_TIMEOUT,
            scroll_threshold: DEFAULT_NEAR_BOTTOM_THRESHOLD,
        }
    }
}

pub struct ChatSession {
    backend: Arc<dyn ChatBackend>,
    store: ConversationStore,
    dispatcher: MessageDispatcher,
    suggestions: SuggestionList,
    health: HealthMonitor,
    scroll: ScrollCoordinator,
    viewport: ViewportMetrics,
    online: bool,
    language: Language,
    input: String,
    notices: VecDeque<Notice>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn ChatBackend>, settings: SessionSettings) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let language = settings.language;

        let store = ConversationStore::seed(language.copy().greeting);
        let mut scroll = ScrollCoordinator::new(settings.scroll_threshold);
        // First render of the seed
        scroll.on_transcript_changed(Origin::Agent, ViewportMetrics::default());

        Self {
            dispatcher: MessageDispatcher::new(Arc::clone(&backend), events_tx.clone()),
            backend,
            store,
            suggestions: SuggestionList::new(),
            health: HealthMonitor::new(settings.health_interval, settings.check_timeout),
            scroll,
            viewport: ViewportMetrics::default(),
            online: true,
            language,
            input: String::new(),
            notices: VecDeque::new(),
            events_tx,
            events_rx,
        }
    }

    /// Start health polling. Requires a tokio runtime.
    pub fn mount(&mut self) {
        self.health.start(Arc::clone(&self.backend), self.events_tx.clone());
    }

    pub fn unmount(&mut self) {
        self.health.stop();
    }

    #[cfg(test)]
    pub fn is_mounted(&self) -> bool {
        self.health.is_running()
    }

    // Accessors

    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    pub fn is_pending(&self) -> bool {
        self.dispatcher.is_pending()
    }

    pub fn pending_for(&self) -> Option<Duration> {
        self.dispatcher.pending_for()
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Whether the composer should render as locked
    pub fn is_locked(&self) -> bool {
        self.is_pending() || !self.online
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn copy(&self) -> &'static UiCopy {
        self.language.copy()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn suggestions(&self) -> &SuggestionList {
        &self.suggestions
    }

    pub fn quick_prompts(&self) -> &'static [&'static str] {
        self.language.corpus()
    }

    // Input

    pub fn on_input_change(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.suggestions.recompute(&self.input, self.language);
    }

    pub fn on_key(&mut self, key: NavKey) -> Option<SubmitOutcome> {
        match key {
            NavKey::Up => {
                self.suggestions.select_prev();
                None
            }
            NavKey::Down => {
                self.suggestions.select_next();
                None
            }
            NavKey::Escape => {
                self.suggestions.dismiss();
                None
            }
            NavKey::Enter => {
                let text = match self.suggestions.on_enter() {
                    EnterAction::Accept(question) => question.to_string(),
                    EnterAction::SendInput => self.input.clone(),
                };
                Some(self.on_submit(&text))
            }
        }
    }

    /// Submit `text` through the dispatcher. Clears the input on accept.
    pub fn on_submit(&mut self, text: &str) -> SubmitOutcome {
        let ctx = DispatchContext {
            online: self.online,
            language: self.language,
        };
        let outcome = self.dispatcher.submit(text, ctx, &mut self.store);

        match outcome {
            SubmitOutcome::Ignored => {}
            SubmitOutcome::Rejected(Rejection::Offline) => {
                self.notices.push_back(Notice::error(self.language.copy().offline_notice));
            }
            SubmitOutcome::Rejected(Rejection::Busy) => {
                self.notices.push_back(Notice::warning(self.language.copy().busy_notice));
            }
            SubmitOutcome::Accepted { .. } => {
                self.input.clear();
                self.suggestions.clear();
                self.scroll.on_transcript_changed(Origin::User, self.viewport);
            }
        }
        outcome
    }

    pub fn set_language(&mut self, language: Language) {
        if language == self.language {
            return;
        }
        tracing::info!("Language changed to {}", language.code());
        self.language = language;
        self.suggestions.recompute(&self.input, language);
    }

    pub fn toggle_language(&mut self) -> Language {
        self.set_language(self.language.toggled());
        self.notices.push_back(Notice::info(self.language.label()));
        self.language
    }

    // Background events

    /// Wait for the next background event. Never resolves to `None` while the
    /// session is alive because it holds a sender itself.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.recv().await
    }

    pub fn try_next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Apply every queued event. Returns true if anything was applied.
    pub fn drain_events(&mut self) -> bool {
        let mut applied = false;
        while let Some(event) = self.try_next_event() {
            self.handle_event(event);
            applied = true;
        }
        applied
    }

    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::HealthChecked(online) => {
                if online != self.online {
                    tracing::info!("Server is now {}", if online { "online" } else { "offline" });
                }
                self.online = online;
                if !online {
                    self.notices.push_back(Notice::error(self.language.copy().offline_notice));
                }
            }
            SessionEvent::DispatchSettled { request, outcome } => {
                let before = self.viewport;
                let len = self.store.len();
                let copy = self.language.copy();
                let notice = self.dispatcher.settle(request, outcome, &mut self.store, copy);
                if self.store.len() > len {
                    self.scroll.on_transcript_changed(Origin::Agent, before);
                }
                if let Some(notice) = notice {
                    self.notices.push_back(notice);
                }
            }
        }
    }

    // Viewport

    /// Record the transcript geometry from the last render
    pub fn update_viewport(&mut self, metrics: ViewportMetrics) {
        self.viewport = metrics;
    }

    pub fn take_scroll_request(&mut self) -> bool {
        self.scroll.take_scroll_request()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.unmount();
    }
}
