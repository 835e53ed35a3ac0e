use std::fmt;

use chrono::{DateTime, Local};

/// Opaque per-conversation message identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mints time-derived ids that stay strictly increasing within one conversation,
/// even when two messages are created in the same millisecond.
#[derive(Debug, Default)]
pub struct MessageIdGenerator {
    last: i64,
}

impl MessageIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_at(&mut self, now: DateTime<Local>) -> MessageId {
        let millis = now.timestamp_millis();
        self.last = if millis > self.last { millis } else { self.last + 1 };
        MessageId(self.last.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    User,
    Agent,
}

/// Payload shared by both message kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBody {
    pub id: MessageId,
    pub text: String,
    pub sent_at: DateTime<Local>,
}

/// A transcript entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    User(MessageBody),
    Agent(MessageBody),
}

impl Message {
    pub fn new(origin: Origin, body: MessageBody) -> Self {
        match origin {
            Origin::User => Message::User(body),
            Origin::Agent => Message::Agent(body),
        }
    }

    pub fn origin(&self) -> Origin {
        match self {
            Message::User(_) => Origin::User,
            Message::Agent(_) => Origin::Agent,
        }
    }

    pub fn body(&self) -> &MessageBody {
        match self {
            Message::User(body) | Message::Agent(body) => body,
        }
    }

    #[cfg(test)]
    pub fn id(&self) -> &MessageId {
        &self.body().id
    }

    pub fn text(&self) -> &str {
        &self.body().text
    }

    pub fn sent_at(&self) -> DateTime<Local> {
        self.body().sent_at
    }

    #[cfg(test)]
    pub fn is_user(&self) -> bool {
        matches!(self, Message::User(_))
    }

    /// Local wall-clock time shown under a bubble
    pub fn time_label(&self) -> String {
        self.sent_at().format("%H:%M").to_string()
    }
}
