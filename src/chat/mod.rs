//! Conversation core: transcript, dispatch, suggestions, liveness and scroll policy.

pub mod dispatcher;
pub mod events;
pub mod health;
pub mod language;
pub mod message;
pub mod scroll;
pub mod session;
pub mod store;
pub mod suggestions;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatcher::{Rejection, SubmitOutcome};
pub use events::{Notice, NoticeLevel, SessionEvent};
pub use language::{Language, UiCopy};
pub use message::{Message, Origin};
pub use scroll::ViewportMetrics;
pub use session::{ChatSession, NavKey, SessionSettings};
