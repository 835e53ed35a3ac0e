use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::chat::{Language, UiCopy};
use crate::config::Theme;

/// Title bar: bot name and subtitle on the left, connection and language on the right
pub struct StatusHeader<'a> {
    copy: &'a UiCopy,
    online: bool,
    language: Language,
}

impl<'a> StatusHeader<'a> {
    pub const HEIGHT: u16 = 4;

    pub fn new(copy: &'a UiCopy, online: bool, language: Language) -> Self {
        Self {
            copy,
            online,
            language,
        }
    }

    fn status_line(&self, theme: &Theme) -> Line<'static> {
        let color = theme.status_color(self.online);
        let text = if self.online { self.copy.online } else { self.copy.offline };
        Line::from(vec![
            Span::styled("● ", Style::default().fg(color)),
            Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ])
    }

    fn language_line(&self, theme: &Theme) -> Line<'static> {
        Line::from(vec![
            Span::styled("Ctrl+L ", Style::default().fg(theme.colors.muted.to_color())),
            Span::styled(
                format!("[{}]", self.language.label()),
                Style::default().fg(theme.colors.secondary.to_color()),
            ),
        ])
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(false));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(24)])
            .split(inner);

        let left = vec![
            Line::from(Span::styled(
                self.copy.title,
                Style::default()
                    .fg(theme.colors.primary.to_color())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.copy.subtitle,
                Style::default().fg(theme.colors.muted.to_color()),
            )),
        ];
        frame.render_widget(Paragraph::new(left), columns[0]);

        let right = vec![self.status_line(theme), self.language_line(theme)];
        frame.render_widget(Paragraph::new(right).alignment(Alignment::Right), columns[1]);
    }
}
