//! Scriptable backend shared by the chat tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::api::types::{ApiError, ChatReply};
use crate::api::ChatBackend;
use crate::chat::Language;

pub struct MockBackend {
    replies: Mutex<VecDeque<Result<ChatReply, ApiError>>>,
    sent: Mutex<Vec<(String, Language)>>,
    sends: AtomicUsize,
    health_checks: AtomicUsize,
    healthy: AtomicBool,
    gate: Option<Arc<Notify>>,
    panics: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            sends: AtomicUsize::new(0),
            health_checks: AtomicUsize::new(0),
            healthy: AtomicBool::new(true),
            gate: None,
            panics: false,
        }
    }

    pub fn with_reply(self, reply: Result<ChatReply, ApiError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    /// Sends block until [`MockBackend::release`] is called
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    pub fn panicking(mut self) -> Self {
        self.panics = true;
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn send_count(&self) -> usize {
        self.sends.load(Ordering::SeqCst)
    }

    pub fn health_check_count(&self) -> usize {
        self.health_checks.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<(String, Language)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn send_message(&self, text: &str, language: Language) -> Result<ChatReply, ApiError> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push((text.to_string(), language));

        if self.panics {
            panic!("backend exploded");
        }
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ChatReply::answered(format!("echo: {}", text))))
    }

    async fn check_health(&self) -> bool {
        self.health_checks.fetch_add(1, Ordering::SeqCst);
        self.healthy.load(Ordering::SeqCst)
    }
}
