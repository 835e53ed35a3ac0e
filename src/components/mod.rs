pub mod chat_input;
pub mod conversation_viewer;
pub mod notification;
pub mod prompt_chips;
pub mod spinner;
pub mod status_header;
pub mod suggestion_popup;

use crossterm::event::Event;
use ratatui::{layout::Rect, Frame};

use crate::action::Action;
use crate::config::Theme;

pub trait Component {
    fn handle_event(&mut self, event: &Event) -> Option<Action>;

    fn update(&mut self, action: &Action);

    fn render(&self, frame: &mut Frame, area: Rect, focused: bool, theme: &Theme);
}
