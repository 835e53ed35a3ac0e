use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::Action;
use crate::components::Component;
use crate::config::Theme;

const CHIP_GAP: usize = 1;
const MORE_LEFT: &str = "‹ ";
const MORE_RIGHT: &str = " ›";
const KEY_HINT: &str = "Tab focus · PgUp/PgDn scroll · Ctrl+Q quit";

/// "Try asking:" row of predefined questions.
///
/// Left/Right move the highlight while the row has focus and Enter submits the
/// highlighted question as is.
pub struct PromptChips {
    prompts: &'static [&'static str],
    label: &'static str,
    selected: usize,
}

impl PromptChips {
    pub fn new(label: &'static str, prompts: &'static [&'static str]) -> Self {
        Self {
            prompts,
            label,
            selected: 0,
        }
    }

    /// Swap the question set, e.g. after a language change
    pub fn set_prompts(&mut self, label: &'static str, prompts: &'static [&'static str]) {
        self.label = label;
        self.prompts = prompts;
        self.selected = self.selected.min(prompts.len().saturating_sub(1));
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_prompt(&self) -> Option<&'static str> {
        self.prompts.get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        if !self.prompts.is_empty() {
            self.selected = (self.selected + 1) % self.prompts.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.prompts.is_empty() {
            self.selected = (self.selected + self.prompts.len() - 1) % self.prompts.len();
        }
    }

    fn chip_text(prompt: &str) -> String {
        format!(" {} ", prompt)
    }

    fn chip_width(prompt: &str) -> usize {
        Span::raw(Self::chip_text(prompt)).width()
    }

    /// Chips `[start, end)` that fit in `width` with the selected one visible
    fn visible_range(&self, width: usize) -> (usize, usize) {
        let widths: Vec<usize> = self.prompts.iter().map(|p| Self::chip_width(p)).collect();
        let fits_from = |start: usize| -> usize {
            let mut used = if start > 0 { MORE_LEFT.chars().count() } else { 0 };
            let mut end = start;
            while end < widths.len() {
                let marker = if end + 1 < widths.len() { MORE_RIGHT.chars().count() } else { 0 };
                let gap = if end > start { CHIP_GAP } else { 0 };
                if used + gap + widths[end] + marker > width && end > start {
                    break;
                }
                used += gap + widths[end];
                end += 1;
            }
            end
        };

        let mut start = 0;
        let mut end = fits_from(start);
        while self.selected >= end && start < self.selected {
            start += 1;
            end = fits_from(start);
        }
        (start, end)
    }

    fn build_line(&self, width: usize, focused: bool, theme: &Theme) -> Line<'static> {
        let (start, end) = self.visible_range(width);
        let muted = Style::default().fg(theme.colors.muted.to_color());

        let mut spans = Vec::new();
        if start > 0 {
            spans.push(Span::styled(MORE_LEFT, muted));
        }
        for (idx, prompt) in self.prompts.iter().enumerate().take(end).skip(start) {
            if idx > start {
                spans.push(Span::raw(" ".repeat(CHIP_GAP)));
            }
            let style = theme.chip_style(focused && idx == self.selected);
            spans.push(Span::styled(Self::chip_text(prompt), style));
        }
        if end < self.prompts.len() {
            spans.push(Span::styled(MORE_RIGHT, muted));
        }
        Line::from(spans)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Left) | (KeyModifiers::NONE, KeyCode::Char('h')) => {
                Some(Action::ChipPrev)
            }
            (KeyModifiers::NONE, KeyCode::Right) | (KeyModifiers::NONE, KeyCode::Char('l')) => {
                Some(Action::ChipNext)
            }
            (_, KeyCode::Enter) => self
                .selected_prompt()
                .map(|prompt| Action::Submit(prompt.to_string())),
            _ => None,
        }
    }
}

impl Component for PromptChips {
    fn handle_event(&mut self, event: &Event) -> Option<Action> {
        match event {
            Event::Key(key) => self.handle_key(*key),
            _ => None,
        }
    }

    fn update(&mut self, action: &Action) {
        match action {
            Action::ChipPrev => self.select_prev(),
            Action::ChipNext => self.select_next(),
            _ => {}
        }
    }

    /// Two rows: the label, then the chips
    fn render(&self, frame: &mut Frame, area: Rect, focused: bool, theme: &Theme) {
        if area.height == 0 || self.prompts.is_empty() {
            return;
        }

        let label_area = Rect { height: 1, ..area };
        let label_style = theme.title_style(focused).add_modifier(Modifier::ITALIC);
        let label = Line::from(Span::styled(self.label, label_style));
        let hint = Line::from(Span::styled(
            KEY_HINT,
            Style::default().fg(theme.colors.muted.to_color()),
        ));
        let fits = label.width() + hint.width() + 2 <= label_area.width as usize;
        let hint_width = hint.width() as u16;
        frame.render_widget(Paragraph::new(label), label_area);

        // Hint only when it fits beside the label
        if fits {
            let hint_area = Rect {
                x: label_area.right() - hint_width,
                width: hint_width,
                ..label_area
            };
            frame.render_widget(Paragraph::new(hint).alignment(Alignment::Right), hint_area);
        }

        if area.height < 2 {
            return;
        }
        let chips_area = Rect {
            y: area.y + 1,
            height: 1,
            ..area
        };
        let line = self.build_line(chips_area.width as usize, focused, theme);
        frame.render_widget(Paragraph::new(line), chips_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    const PROMPTS: &[&str] = &["alpha", "bravo", "charlie", "delta"];

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_navigation_wraps() {
        let mut chips = PromptChips::new("Try asking:", PROMPTS);
        chips.select_prev();
        assert_eq!(chips.selected_prompt(), Some("delta"));
        chips.select_next();
        assert_eq!(chips.selected_prompt(), Some("alpha"));
    }

    #[test]
    fn test_keys_map_to_actions() {
        let mut chips = PromptChips::new("Try asking:", PROMPTS);
        assert_eq!(chips.handle_event(&key(KeyCode::Right)), Some(Action::ChipNext));
        chips.update(&Action::ChipNext);
        assert_eq!(
            chips.handle_event(&key(KeyCode::Enter)),
            Some(Action::Submit("bravo".to_string()))
        );
        assert_eq!(chips.handle_event(&key(KeyCode::Left)), Some(Action::ChipPrev));
    }

    #[test]
    fn test_set_prompts_clamps_selection() {
        let mut chips = PromptChips::new("Try asking:", PROMPTS);
        chips.select_prev();
        chips.set_prompts("पूछकर देखें:", &["one", "two"]);
        assert_eq!(chips.selected(), 1);
    }

    #[test]
    fn test_visible_range_everything_fits() {
        let chips = PromptChips::new("Try asking:", PROMPTS);
        assert_eq!(chips.visible_range(200), (0, 4));
    }

    #[test]
    fn test_visible_range_follows_selection() {
        let mut chips = PromptChips::new("Try asking:", PROMPTS);
        // " alpha " is 7 wide; room for two chips plus markers
        let (start, end) = chips.visible_range(20);
        assert_eq!(start, 0);
        assert!(end < PROMPTS.len());

        chips.select_prev();
        let (start, end) = chips.visible_range(20);
        assert!(start > 0);
        assert_eq!(end, PROMPTS.len());
    }

    #[test]
    fn test_render_shows_label_and_chips() {
        let chips = PromptChips::new("Try asking:", PROMPTS);
        let mut terminal = Terminal::new(TestBackend::new(60, 2)).unwrap();
        terminal
            .draw(|f| chips.render(f, f.area(), true, &Theme::default()))
            .unwrap();
        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(rendered.contains("Try asking:"));
        assert!(rendered.contains("charlie"));
    }

    #[test]
    fn test_key_hint_shown_only_when_it_fits() {
        let chips = PromptChips::new("Try asking:", PROMPTS);
        let draw = |width: u16| {
            let mut terminal = Terminal::new(TestBackend::new(width, 2)).unwrap();
            terminal
                .draw(|f| chips.render(f, f.area(), false, &Theme::default()))
                .unwrap();
            let rendered: String = terminal
                .backend()
                .buffer()
                .content()
                .iter()
                .map(|c| c.symbol())
                .collect();
            rendered
        };

        let wide = draw(80);
        assert!(wide.contains("Ctrl+Q quit"));
        assert!(wide.contains("Try asking:"));

        let narrow = draw(30);
        assert!(!narrow.contains("Ctrl+Q"));
        assert!(narrow.contains("Try asking:"));
    }
}
