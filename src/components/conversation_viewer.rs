use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEventKind};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};

use crate::action::Action;
use crate::chat::{Message, Origin, ViewportMetrics};
use crate::components::spinner::{Spinner, SpinnerStyle};
use crate::components::Component;
use crate::config::Theme;

const USER_LABEL: &str = "You";
const AGENT_LABEL: &str = "LCB";
const MOUSE_SCROLL_ROWS: u16 = 3;

/// What the transcript should show besides the messages themselves
#[derive(Debug, Clone, Copy, Default)]
pub struct TranscriptView<'a> {
    /// Label of the typing indicator while a reply is pending
    pub typing: Option<&'a str>,
    pub show_timestamps: bool,
}

/// Scrollable transcript of chat bubbles.
///
/// The viewer never decides on its own to follow the tail. The session asks
/// for it through [`request_scroll_to_bottom`](Self::request_scroll_to_bottom)
/// and the request is applied on the next render, once the new content height
/// is known.
pub struct ConversationViewer {
    scroll_offset: usize,
    content_height: usize,
    visible_height: usize,
    pending_scroll_to_bottom: bool,
    typing_spinner: Spinner,
}

impl ConversationViewer {
    pub fn new() -> Self {
        Self {
            scroll_offset: 0,
            content_height: 0,
            visible_height: 0,
            pending_scroll_to_bottom: false,
            typing_spinner: Spinner::new(SpinnerStyle::Dots),
        }
    }

    pub fn with_spinner(mut self, spinner: Spinner) -> Self {
        self.typing_spinner = spinner;
        self
    }

    /// Returns true when the indicator frame changed
    pub fn tick_spinner(&mut self) -> bool {
        self.typing_spinner.tick()
    }

    pub fn reset_spinner(&mut self) {
        self.typing_spinner.reset();
    }

    pub fn request_scroll_to_bottom(&mut self) {
        self.pending_scroll_to_bottom = true;
    }

    #[cfg(test)]
    pub fn has_pending_scroll(&self) -> bool {
        self.pending_scroll_to_bottom
    }

    pub fn metrics(&self) -> ViewportMetrics {
        ViewportMetrics {
            offset: self.scroll_offset,
            content_height: self.content_height,
            viewport_height: self.visible_height,
        }
    }

    fn max_offset(&self) -> usize {
        self.content_height.saturating_sub(self.visible_height)
    }

    pub fn scroll_up(&mut self, n: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n as usize);
    }

    pub fn scroll_down(&mut self, n: u16) {
        self.scroll_offset = (self.scroll_offset + n as usize).min(self.max_offset());
    }

    pub fn page_up(&mut self) {
        let page = self.visible_height.saturating_sub(1).max(1);
        self.scroll_offset = self.scroll_offset.saturating_sub(page);
    }

    pub fn page_down(&mut self) {
        let page = self.visible_height.saturating_sub(1).max(1);
        self.scroll_offset = (self.scroll_offset + page).min(self.max_offset());
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_offset();
    }

    fn message_lines(message: &Message, view: TranscriptView<'_>, theme: &Theme) -> Vec<Line<'static>> {
        let origin = message.origin();
        let (label, alignment) = match origin {
            Origin::User => (USER_LABEL, Alignment::Right),
            Origin::Agent => (AGENT_LABEL, Alignment::Left),
        };
        let bubble = theme.bubble_style(origin);

        let mut header = vec![Span::styled(
            label,
            Style::default()
                .fg(theme.colors.accent.to_color())
                .add_modifier(Modifier::BOLD),
        )];
        if view.show_timestamps {
            header.push(Span::styled(
                format!(" · {}", message.time_label()),
                Style::default().fg(theme.chat.timestamp_fg.to_color()),
            ));
        }

        let mut lines = vec![Line::from(header).alignment(alignment)];
        // An empty reply still gets one bubble row
        for text in message.text().split('\n') {
            let text = text.strip_suffix('\r').unwrap_or(text);
            lines.push(Line::from(Span::styled(format!(" {} ", text), bubble)).alignment(alignment));
        }
        lines.push(Line::default());
        lines
    }

    fn build_lines(&self, messages: &[Message], view: TranscriptView<'_>, theme: &Theme) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = messages
            .iter()
            .flat_map(|m| Self::message_lines(m, view, theme))
            .collect();

        if let Some(label) = view.typing {
            lines.push(self.typing_spinner.line(label));
        }
        lines
    }

    /// Draw the transcript and report the geometry it was drawn with
    pub fn render_transcript(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        focused: bool,
        messages: &[Message],
        view: TranscriptView<'_>,
        theme: &Theme,
    ) -> ViewportMetrics {
        let block = Block::default()
            .title(" Conversation ")
            .title_style(theme.title_style(focused))
            .borders(Borders::ALL)
            .border_style(theme.border_style(focused));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Last column is reserved for the scrollbar
        let text_area = Rect {
            width: inner.width.saturating_sub(1),
            ..inner
        };

        let lines = self.build_lines(messages, view, theme);
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });

        self.visible_height = text_area.height as usize;
        self.content_height = if text_area.width == 0 {
            0
        } else {
            paragraph.line_count(text_area.width)
        };

        if self.pending_scroll_to_bottom {
            self.pending_scroll_to_bottom = false;
            self.scroll_offset = self.max_offset();
        } else {
            self.scroll_offset = self.scroll_offset.min(self.max_offset());
        }

        let offset = self.scroll_offset.min(u16::MAX as usize) as u16;
        frame.render_widget(paragraph.scroll((offset, 0)), text_area);

        if self.content_height > self.visible_height {
            let scrollbar = Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));

            let mut scrollbar_state = ScrollbarState::new(self.max_offset())
                .position(self.scroll_offset)
                .viewport_content_length(self.visible_height);

            frame.render_stateful_widget(scrollbar, inner, &mut scrollbar_state);
        }

        self.metrics()
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
                Some(Action::ScrollUp(1))
            }
            (KeyModifiers::NONE, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
                Some(Action::ScrollDown(1))
            }
            (_, KeyCode::PageUp) => Some(Action::ScrollPageUp),
            (_, KeyCode::PageDown) => Some(Action::ScrollPageDown),
            (KeyModifiers::NONE, KeyCode::Home) | (KeyModifiers::NONE, KeyCode::Char('g')) => {
                Some(Action::ScrollToTop)
            }
            (KeyModifiers::NONE, KeyCode::End) | (KeyModifiers::SHIFT, KeyCode::Char('G')) => {
                Some(Action::ScrollToBottom)
            }
            _ => None,
        }
    }
}

impl Default for ConversationViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ConversationViewer {
    fn handle_event(&mut self, event: &Event) -> Option<Action> {
        match event {
            Event::Key(key) => self.handle_key(*key),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => Some(Action::ScrollUp(MOUSE_SCROLL_ROWS)),
                MouseEventKind::ScrollDown => Some(Action::ScrollDown(MOUSE_SCROLL_ROWS)),
                _ => None,
            },
            _ => None,
        }
    }

    fn update(&mut self, action: &Action) {
        match action {
            Action::ScrollUp(n) => self.scroll_up(*n),
            Action::ScrollDown(n) => self.scroll_down(*n),
            Action::ScrollPageUp => self.page_up(),
            Action::ScrollPageDown => self.page_down(),
            Action::ScrollToTop => self.scroll_to_top(),
            Action::ScrollToBottom => self.scroll_to_bottom(),
            _ => {}
        }
    }

    fn render(&self, _frame: &mut Frame, _area: Rect, _focused: bool, _theme: &Theme) {
        // Needs messages and records geometry; use render_transcript()
    }
}
