use chrono::Local;

use super::message::{Message, MessageBody, MessageIdGenerator, Origin};

/// Ordered, append-only transcript. Always starts with exactly one agent greeting.
#[derive(Debug)]
pub struct ConversationStore {
    messages: Vec<Message>,
    ids: MessageIdGenerator,
}

impl ConversationStore {
    /// Initial single-message state
    pub fn seed(greeting: impl Into<String>) -> Self {
        let mut store = Self {
            messages: Vec::new(),
            ids: MessageIdGenerator::new(),
        };
        store.append(Origin::Agent, greeting);
        store
    }

    pub fn append(&mut self, origin: Origin, text: impl Into<String>) -> &Message {
        let now = Local::now();
        let body = MessageBody {
            id: self.ids.next_at(now),
            text: text.into(),
            sent_at: now,
        };
        tracing::debug!(id = %body.id, ?origin, "Appending message");
        self.messages.push(Message::new(origin, body));
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_has_single_agent_greeting() {
        let store = ConversationStore::seed("Hello");
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        assert_eq!(store.messages()[0].origin(), Origin::Agent);
        assert_eq!(store.messages()[0].text(), "Hello");
    }

    #[test]
    fn test_append_preserves_prefix() {
        let mut store = ConversationStore::seed("Hello");
        let before: Vec<Message> = store.messages().to_vec();

        store.append(Origin::User, "q1");
        store.append(Origin::Agent, "a1");

        assert_eq!(store.len(), 3);
        assert_eq!(&store.messages()[..1], &before[..]);
        assert_eq!(store.last().map(|m| m.text()), Some("a1"));
    }

    #[test]
    fn test_ids_unique_under_burst() {
        let mut store = ConversationStore::seed("Hello");
        for i in 0..200 {
            store.append(if i % 2 == 0 { Origin::User } else { Origin::Agent }, format!("m{}", i));
        }
        let ids: HashSet<_> = store.messages().iter().map(|m| m.id().clone()).collect();
        assert_eq!(ids.len(), store.len());
    }
}
