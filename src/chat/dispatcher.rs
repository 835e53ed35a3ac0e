//! Outbound question lifecycle.
//!
//! `Idle -> Sending -> Idle`. The only way into `Sending` is an accepted
//! [`MessageDispatcher::submit`]; the only way out is [`MessageDispatcher::settle`],
//! which runs for every outcome. The request task reports through a
//! [`SettleGuard`], so a task that panics or is dropped still produces an
//! `Aborted` settle event and the lock is released.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use super::events::{DispatchOutcome, Notice, RequestId, SessionEvent};
use super::language::{Language, UiCopy};
use super::message::Origin;
use super::store::ConversationStore;
use crate::api::ChatBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Sending { request: RequestId, since: Instant },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Offline,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, nothing happened
    Ignored,
    Rejected(Rejection),
    Accepted { request: RequestId },
}

/// Inputs the dispatcher needs from the session at submit time
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext {
    pub online: bool,
    pub language: Language,
}

pub struct MessageDispatcher {
    backend: Arc<dyn ChatBackend>,
    events: mpsc::UnboundedSender<SessionEvent>,
    state: DispatchState,
    next_request: RequestId,
}

impl MessageDispatcher {
    pub fn new(backend: Arc<dyn ChatBackend>, events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            backend,
            events,
            state: DispatchState::Idle,
            next_request: 1,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, DispatchState::Sending { .. })
    }

    /// How long the current question has been waiting
    pub fn pending_for(&self) -> Option<Duration> {
        match self.state {
            DispatchState::Sending { since, .. } => Some(since.elapsed()),
            DispatchState::Idle => None,
        }
    }

    /// Validate, append the user message, and start the remote call.
    /// Must be called from within a tokio runtime.
    pub fn submit(
        &mut self,
        text: &str,
        ctx: DispatchContext,
        store: &mut ConversationStore,
    ) -> SubmitOutcome {
        if text.trim().is_empty() {
            return SubmitOutcome::Ignored;
        }
        if !ctx.online {
            tracing::info!("Send rejected: server offline");
            return SubmitOutcome::Rejected(Rejection::Offline);
        }
        if self.is_pending() {
            tracing::info!("Send rejected: a question is already in flight");
            return SubmitOutcome::Rejected(Rejection::Busy);
        }

        store.append(Origin::User, text);

        let request = self.next_request;
        self.next_request += 1;
        self.state = DispatchState::Sending {
            request,
            since: Instant::now(),
        };

        tracing::info!(request, chars = text.len(), language = ctx.language.code(), "Sending question");
        self.spawn_request(request, text.to_string(), ctx.language);

        SubmitOutcome::Accepted { request }
    }

    fn spawn_request(&self, request: RequestId, text: String, language: Language) {
        let backend = Arc::clone(&self.backend);
        let guard = SettleGuard::new(request, self.events.clone());

        tokio::spawn(async move {
            let outcome = match backend.send_message(&text, language).await {
                Ok(reply) if reply.success => DispatchOutcome::Replied(reply.response),
                Ok(_) => DispatchOutcome::Declined,
                Err(e) => DispatchOutcome::TransportFailed(e.to_string()),
            };
            guard.settle(outcome);
        });
    }

    /// Apply a finished request. Returns to `Idle` on every outcome and
    /// returns the notice to show, if any. Failures leave the transcript untouched.
    pub fn settle(
        &mut self,
        request: RequestId,
        outcome: DispatchOutcome,
        store: &mut ConversationStore,
        copy: &UiCopy,
    ) -> Option<Notice> {
        match self.state {
            DispatchState::Sending { request: current, since } if current == request => {
                tracing::debug!(request, elapsed_ms = since.elapsed().as_millis() as u64, "Question settled");
            }
            _ => {
                tracing::warn!(request, state = ?self.state, "Ignoring settle for unknown request");
                return None;
            }
        }
        self.state = DispatchState::Idle;

        match outcome {
            DispatchOutcome::Replied(text) => {
                store.append(Origin::Agent, text);
                None
            }
            DispatchOutcome::Declined => {
                tracing::warn!(request, "Answering service reported failure");
                Some(Notice::error(copy.reply_failed))
            }
            DispatchOutcome::TransportFailed(message) => {
                tracing::error!(request, "Error getting reply: {}", message);
                Some(Notice::error(copy.transport_failed))
            }
            DispatchOutcome::Aborted => {
                tracing::error!(request, "Request task ended without a result");
                Some(Notice::error(copy.transport_failed))
            }
        }
    }
}

/// Reports exactly one settle event for a request, `Aborted` if dropped unreported.
struct SettleGuard {
    request: RequestId,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl SettleGuard {
    fn new(request: RequestId, events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            request,
            events: Some(events),
        }
    }

    fn settle(mut self, outcome: DispatchOutcome) {
        self.report(outcome);
    }

    fn report(&mut self, outcome: DispatchOutcome) {
        if let Some(events) = self.events.take() {
            // Receiver gone means the session was torn down; nothing left to release.
            let _ = events.send(SessionEvent::DispatchSettled {
                request: self.request,
                outcome,
            });
        }
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        self.report(DispatchOutcome::Aborted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::testing::MockBackend;
    use crate::api::types::{ApiError, ChatReply};

    fn setup(backend: Arc<MockBackend>) -> (MessageDispatcher, mpsc::UnboundedReceiver<SessionEvent>, ConversationStore) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = MessageDispatcher::new(backend, tx);
        (dispatcher, rx, ConversationStore::seed("Hello"))
    }

    const ONLINE: DispatchContext = DispatchContext {
        online: true,
        language: Language::English,
    };

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let backend = Arc::new(MockBackend::new());
        let (mut dispatcher, _rx, mut store) = setup(backend.clone());

        assert_eq!(dispatcher.submit("", ONLINE, &mut store), SubmitOutcome::Ignored);
        assert_eq!(dispatcher.submit("   ", ONLINE, &mut store), SubmitOutcome::Ignored);
        assert_eq!(store.len(), 1);
        assert!(!dispatcher.is_pending());
        tokio::task::yield_now().await;
        assert_eq!(backend.send_count(), 0);
    }

    #[tokio::test]
    async fn test_offline_rejected_without_call() {
        let backend = Arc::new(MockBackend::new());
        let (mut dispatcher, _rx, mut store) = setup(backend.clone());

        let ctx = DispatchContext { online: false, ..ONLINE };
        assert_eq!(
            dispatcher.submit("hello", ctx, &mut store),
            SubmitOutcome::Rejected(Rejection::Offline)
        );
        assert_eq!(store.len(), 1);
        tokio::task::yield_now().await;
        assert_eq!(backend.send_count(), 0);
    }

    #[tokio::test]
    async fn test_accept_appends_user_and_locks() {
        let backend = Arc::new(MockBackend::new().with_reply(Ok(ChatReply::answered("ok"))));
        let (mut dispatcher, mut rx, mut store) = setup(backend.clone());

        let outcome = dispatcher.submit("hello", ONLINE, &mut store);
        assert_eq!(outcome, SubmitOutcome::Accepted { request: 1 });
        assert!(dispatcher.is_pending());
        assert!(dispatcher.pending_for().is_some());
        assert_eq!(store.len(), 2);
        assert_eq!(store.messages()[1].origin(), Origin::User);

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            SessionEvent::DispatchSettled {
                request: 1,
                outcome: DispatchOutcome::Replied("ok".to_string()),
            }
        );
        assert_eq!(backend.sent(), vec![("hello".to_string(), Language::English)]);
    }

    #[tokio::test]
    async fn test_busy_while_sending() {
        let backend = Arc::new(MockBackend::new().gated());
        let (mut dispatcher, _rx, mut store) = setup(backend.clone());

        dispatcher.submit("first", ONLINE, &mut store);
        assert_eq!(
            dispatcher.submit("second", ONLINE, &mut store),
            SubmitOutcome::Rejected(Rejection::Busy)
        );
        assert_eq!(store.len(), 2);
        tokio::task::yield_now().await;
        assert_eq!(backend.send_count(), 1);
    }

    #[tokio::test]
    async fn test_settle_outcomes_release_lock() {
        let copy = Language::English.copy();
        let cases = [
            (DispatchOutcome::Replied("answer".to_string()), None, 3),
            (DispatchOutcome::Declined, Some(Notice::error(copy.reply_failed)), 2),
            (
                DispatchOutcome::TransportFailed("boom".to_string()),
                Some(Notice::error(copy.transport_failed)),
                2,
            ),
            (DispatchOutcome::Aborted, Some(Notice::error(copy.transport_failed)), 2),
        ];

        for (outcome, expected_notice, expected_len) in cases {
            let backend = Arc::new(MockBackend::new().gated());
            let (mut dispatcher, _rx, mut store) = setup(backend);
            let SubmitOutcome::Accepted { request } = dispatcher.submit("q", ONLINE, &mut store) else {
                panic!("expected accept");
            };

            let notice = dispatcher.settle(request, outcome, &mut store, copy);
            assert_eq!(notice, expected_notice);
            assert_eq!(store.len(), expected_len);
            assert_eq!(dispatcher.state(), DispatchState::Idle);
        }
    }

    #[tokio::test]
    async fn test_unknown_settle_is_ignored() {
        let backend = Arc::new(MockBackend::new().gated());
        let (mut dispatcher, _rx, mut store) = setup(backend);
        dispatcher.submit("q", ONLINE, &mut store);

        let notice = dispatcher.settle(99, DispatchOutcome::Declined, &mut store, Language::English.copy());
        assert!(notice.is_none());
        assert!(dispatcher.is_pending());
    }

    #[tokio::test]
    async fn test_transport_error_reported() {
        let backend = Arc::new(MockBackend::new().with_reply(Err(ApiError::Network {
            message: "refused".to_string(),
        })));
        let (mut dispatcher, mut rx, mut store) = setup(backend);
        dispatcher.submit("q", ONLINE, &mut store);

        match rx.recv().await.unwrap() {
            SessionEvent::DispatchSettled { outcome: DispatchOutcome::TransportFailed(msg), .. } => {
                assert!(msg.contains("refused"));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_panicking_backend_still_settles() {
        let backend = Arc::new(MockBackend::new().panicking());
        let (mut dispatcher, mut rx, mut store) = setup(backend);
        dispatcher.submit("q", ONLINE, &mut store);

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            SessionEvent::DispatchSettled {
                request: 1,
                outcome: DispatchOutcome::Aborted,
            }
        );
        dispatcher.settle(1, DispatchOutcome::Aborted, &mut store, Language::English.copy());
        assert!(!dispatcher.is_pending());
    }
}
