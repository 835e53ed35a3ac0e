use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::action::Action;
use crate::chat::NavKey;
use crate::components::Component;
use crate::config::Theme;

/// Single-line composer for questions.
///
/// Edits are reported as [`Action::InputChanged`] with the full buffer so the
/// session can recompute suggestions. Enter, Up, Down and Escape are forwarded
/// as [`Action::Nav`] and resolved by the session.
pub struct ChatInput {
    buffer: String,
    /// Cursor position in chars
    cursor: usize,
    /// First visible char when the text is wider than the box
    scroll_offset: usize,
    placeholder: String,
    locked: bool,
}

impl ChatInput {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            scroll_offset: 0,
            placeholder: String::new(),
            locked: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    /// Replace the buffer, cursor at the end
    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor = self.char_len();
    }

    pub fn set_placeholder(&mut self, placeholder: &str) {
        self.placeholder = placeholder.to_string();
    }

    /// Locked while a reply is pending or the server is offline. Typing still works.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn changed(&self) -> Option<Action> {
        Some(Action::InputChanged(self.buffer.clone()))
    }

    /// Paste as one line; newlines become spaces
    pub fn paste_text(&mut self, text: &str) -> Option<Action> {
        for c in text.chars() {
            match c {
                '\r' => {}
                '\n' | '\t' => self.insert_char(' '),
                c => self.insert_char(c),
            }
        }
        self.changed()
    }

    fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_pos(&self.buffer, self.cursor);
        self.buffer.insert(byte_pos, c);
        self.cursor += 1;
    }

    fn delete_char_before(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = char_to_byte_pos(&self.buffer, self.cursor - 1);
        let end = char_to_byte_pos(&self.buffer, self.cursor);
        self.buffer.replace_range(start..end, "");
        self.cursor -= 1;
        true
    }

    fn delete_char_at(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let start = char_to_byte_pos(&self.buffer, self.cursor);
        let end = char_to_byte_pos(&self.buffer, self.cursor + 1);
        self.buffer.replace_range(start..end, "");
        true
    }

    /// Ctrl+W: delete the word before the cursor
    fn delete_word_before(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let chars: Vec<char> = self.buffer.chars().collect();
        let mut start = self.cursor;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        let byte_start = char_to_byte_pos(&self.buffer, start);
        let byte_end = char_to_byte_pos(&self.buffer, self.cursor);
        self.buffer.replace_range(byte_start..byte_end, "");
        self.cursor = start;
        true
    }

    fn delete_to_end(&mut self) -> bool {
        let byte_pos = char_to_byte_pos(&self.buffer, self.cursor);
        if byte_pos == self.buffer.len() {
            return false;
        }
        self.buffer.truncate(byte_pos);
        true
    }

    fn delete_to_start(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let byte_pos = char_to_byte_pos(&self.buffer, self.cursor);
        self.buffer.replace_range(..byte_pos, "");
        self.cursor = 0;
        true
    }

    fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match (key.modifiers, key.code) {
            (_, KeyCode::Enter) => Some(Action::Nav(NavKey::Enter)),
            (_, KeyCode::Esc) => Some(Action::Nav(NavKey::Escape)),
            (KeyModifiers::NONE, KeyCode::Up) => Some(Action::Nav(NavKey::Up)),
            (KeyModifiers::NONE, KeyCode::Down) => Some(Action::Nav(NavKey::Down)),

            (_, KeyCode::Backspace) => {
                if self.delete_char_before() {
                    self.changed()
                } else {
                    Some(Action::None)
                }
            }
            (_, KeyCode::Delete) => {
                if self.delete_char_at() {
                    self.changed()
                } else {
                    Some(Action::None)
                }
            }

            (KeyModifiers::NONE, KeyCode::Left) | (KeyModifiers::CONTROL, KeyCode::Char('b')) => {
                self.move_left();
                Some(Action::None)
            }
            (KeyModifiers::NONE, KeyCode::Right) | (KeyModifiers::CONTROL, KeyCode::Char('f')) => {
                self.move_right();
                Some(Action::None)
            }
            (KeyModifiers::NONE, KeyCode::Home) | (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
                self.cursor = 0;
                Some(Action::None)
            }
            (KeyModifiers::NONE, KeyCode::End) | (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
                self.cursor = self.char_len();
                Some(Action::None)
            }

            (KeyModifiers::CONTROL, KeyCode::Char('k')) => {
                if self.delete_to_end() {
                    self.changed()
                } else {
                    Some(Action::None)
                }
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
                if self.delete_to_start() {
                    self.changed()
                } else {
                    Some(Action::None)
                }
            }
            (KeyModifiers::CONTROL, KeyCode::Char('w')) => {
                if self.delete_word_before() {
                    self.changed()
                } else {
                    Some(Action::None)
                }
            }

            (KeyModifiers::NONE, KeyCode::Char(c)) | (KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.insert_char(c);
                self.changed()
            }

            // Tab and the rest bubble up to the global handler
            _ => None,
        }
    }

    /// Keep the cursor inside a window of `width` chars
    fn visible_window(&self, width: usize) -> usize {
        let mut offset = self.scroll_offset;
        if self.cursor < offset {
            offset = self.cursor;
        } else if width > 0 && self.cursor >= offset + width {
            offset = self.cursor + 1 - width;
        }
        offset.min(self.char_len())
    }

    pub fn render_input(&mut self, frame: &mut Frame, area: Rect, focused: bool, theme: &Theme) {
        let title = if self.locked { " Message 🔒 " } else { " Message " };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(focused))
            .title(Span::styled(title, theme.title_style(focused)));

        let inner = block.inner(area);
        let width = inner.width as usize;
        if width == 0 {
            frame.render_widget(block, area);
            return;
        }

        let text_style = if self.locked {
            Style::default().fg(theme.chat.locked_fg.to_color())
        } else {
            Style::default().fg(theme.colors.foreground.to_color())
        };
        let cursor_style = Style::default()
            .fg(theme.colors.background.to_color())
            .bg(theme.colors.foreground.to_color());

        let line = if self.buffer.is_empty() {
            let mut spans = Vec::new();
            if focused {
                spans.push(Span::styled(" ", cursor_style));
            }
            spans.push(Span::styled(
                self.placeholder.clone(),
                Style::default()
                    .fg(theme.colors.muted.to_color())
                    .add_modifier(Modifier::ITALIC),
            ));
            Line::from(spans)
        } else {
            // Leave a column for the end-of-line cursor
            self.scroll_offset = self.visible_window(width.saturating_sub(1).max(1));
            let chars: Vec<char> = self.buffer.chars().collect();
            let end = (self.scroll_offset + width).min(chars.len());
            let visible = &chars[self.scroll_offset..end];

            let mut spans = Vec::new();
            for (i, c) in visible.iter().enumerate() {
                let style = if focused && self.scroll_offset + i == self.cursor {
                    cursor_style
                } else {
                    text_style
                };
                spans.push(Span::styled(c.to_string(), style));
            }
            if focused && self.cursor >= end {
                spans.push(Span::styled(" ", cursor_style));
            }
            Line::from(spans)
        };

        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}

impl Default for ChatInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ChatInput {
    fn handle_event(&mut self, event: &Event) -> Option<Action> {
        match event {
            Event::Key(key) => self.handle_key(*key),
            Event::Paste(text) => self.paste_text(text),
            _ => None,
        }
    }

    fn update(&mut self, action: &Action) {
        if let Action::Submit(_) = action {
            self.clear();
        }
    }

    fn render(&self, _frame: &mut Frame, _area: Rect, _focused: bool, _theme: &Theme) {
        // Needs &mut self to track horizontal scroll; use render_input()
    }
}

/// Convert a character index to a byte index in a string
fn char_to_byte_pos(s: &str, char_pos: usize) -> usize {
    s.char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_str(input: &mut ChatInput, s: &str) -> Option<Action> {
        let mut last = None;
        for c in s.chars() {
            last = input.handle_event(&key(KeyCode::Char(c)));
        }
        last
    }

    #[test]
    fn test_typing_reports_full_buffer() {
        let mut input = ChatInput::new();
        let action = type_str(&mut input, "Hi there");
        assert_eq!(action, Some(Action::InputChanged("Hi there".to_string())));
        assert_eq!(input.cursor(), 8);
    }

    #[test]
    fn test_nav_keys_forwarded() {
        let mut input = ChatInput::new();
        assert_eq!(input.handle_event(&key(KeyCode::Enter)), Some(Action::Nav(NavKey::Enter)));
        assert_eq!(input.handle_event(&key(KeyCode::Up)), Some(Action::Nav(NavKey::Up)));
        assert_eq!(input.handle_event(&key(KeyCode::Down)), Some(Action::Nav(NavKey::Down)));
        assert_eq!(input.handle_event(&key(KeyCode::Esc)), Some(Action::Nav(NavKey::Escape)));
        assert_eq!(input.handle_event(&key(KeyCode::Tab)), None);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut input = ChatInput::new();
        type_str(&mut input, "abc");
        assert_eq!(
            input.handle_event(&key(KeyCode::Backspace)),
            Some(Action::InputChanged("ab".to_string()))
        );
        input.handle_event(&key(KeyCode::Home));
        assert_eq!(
            input.handle_event(&key(KeyCode::Delete)),
            Some(Action::InputChanged("b".to_string()))
        );
        input.handle_event(&key(KeyCode::Home));
        assert_eq!(input.handle_event(&key(KeyCode::Backspace)), Some(Action::None));
    }

    #[test]
    fn test_insert_in_middle() {
        let mut input = ChatInput::new();
        type_str(&mut input, "ac");
        input.handle_event(&key(KeyCode::Left));
        type_str(&mut input, "b");
        assert_eq!(input.text(), "abc");
    }

    #[test]
    fn test_emacs_kills() {
        let mut input = ChatInput::new();
        type_str(&mut input, "how to apply urea");
        assert_eq!(
            input.handle_event(&ctrl('w')),
            Some(Action::InputChanged("how to apply ".to_string()))
        );
        input.handle_event(&ctrl('a'));
        input.handle_event(&key(KeyCode::Right));
        input.handle_event(&key(KeyCode::Right));
        input.handle_event(&key(KeyCode::Right));
        assert_eq!(input.handle_event(&ctrl('k')), Some(Action::InputChanged("how".to_string())));
        assert_eq!(input.handle_event(&ctrl('u')), Some(Action::InputChanged(String::new())));
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut input = ChatInput::new();
        let action = input.handle_event(&Event::Paste("line one\r\nline two".to_string()));
        assert_eq!(action, Some(Action::InputChanged("line one line two".to_string())));
    }

    #[test]
    fn test_unicode_editing() {
        let mut input = ChatInput::new();
        type_str(&mut input, "नव्यकोश");
        let len = "नव्यकोश".chars().count();
        assert_eq!(input.cursor(), len);
        input.handle_event(&key(KeyCode::Backspace));
        assert_eq!(input.text().chars().count(), len - 1);
    }

    #[test]
    fn test_set_text_and_clear() {
        let mut input = ChatInput::new();
        input.set_text("Where can I buy Navyakosh?");
        assert_eq!(input.cursor(), 26);
        input.update(&Action::Submit("x".to_string()));
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_visible_window_follows_cursor() {
        let mut input = ChatInput::new();
        input.set_text("abcdefghij");
        assert_eq!(input.visible_window(4), 7);
        input.cursor = 0;
        assert_eq!(input.visible_window(4), 0);
    }
}
