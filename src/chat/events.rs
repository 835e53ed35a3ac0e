/// Identifies one outbound question
pub type RequestId = u64;

/// Everything that reaches the session from background tasks.
/// Drained on the UI thread so state is only ever mutated in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    HealthChecked(bool),
    DispatchSettled {
        request: RequestId,
        outcome: DispatchOutcome,
    },
}

/// How an in-flight question ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Replied(String),
    /// Well-formed reply with `success == false`
    Declined,
    TransportFailed(String),
    /// The request task ended without reporting (panicked or was dropped)
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Transient user-visible message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}
