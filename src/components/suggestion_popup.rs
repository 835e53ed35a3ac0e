use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};

use crate::chat::suggestions::SuggestionList;
use crate::config::Theme;

/// Autocomplete list drawn directly above the composer
pub struct SuggestionPopup;

impl SuggestionPopup {
    /// Rows the popup needs for `count` items, borders included
    pub fn height(count: usize) -> u16 {
        if count == 0 {
            0
        } else {
            count as u16 + 2
        }
    }

    /// Place the popup above `anchor`, clipped to `bounds`
    pub fn area_above(anchor: Rect, count: usize, bounds: Rect) -> Option<Rect> {
        let wanted = Self::height(count);
        let room = anchor.y.saturating_sub(bounds.y);
        let height = wanted.min(room);
        if height < 3 {
            return None;
        }
        Some(Rect::new(anchor.x, anchor.y - height, anchor.width, height))
    }

    pub fn render(
        frame: &mut Frame,
        anchor: Rect,
        bounds: Rect,
        suggestions: &SuggestionList,
        query: &str,
        theme: &Theme,
    ) {
        if !suggestions.is_visible() {
            return;
        }
        let Some(area) = Self::area_above(anchor, suggestions.items().len(), bounds) else {
            return;
        };

        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.colors.primary.to_color()));

        let items: Vec<ListItem> = suggestions
            .items()
            .iter()
            .copied()
            .map(|question| ListItem::new(highlight_match(question, query, theme)))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(theme.chip_style(true))
            .highlight_symbol("▸ ");

        let mut state = ListState::default().with_selected(suggestions.selected());
        frame.render_stateful_widget(list, area, &mut state);
    }
}

/// Bold the first case-insensitive occurrence of `query` in `text`
fn highlight_match(text: &'static str, query: &str, theme: &Theme) -> Line<'static> {
    let base = Style::default().fg(theme.colors.foreground.to_color());
    let hit = Style::default()
        .fg(theme.colors.accent.to_color())
        .add_modifier(Modifier::BOLD);

    match match_range(text, query) {
        Some((start, end)) => {
            let chars: Vec<char> = text.chars().collect();
            let before: String = chars[..start].iter().collect();
            let matched: String = chars[start..end].iter().collect();
            let after: String = chars[end..].iter().collect();
            Line::from(vec![
                Span::styled(before, base),
                Span::styled(matched, hit),
                Span::styled(after, base),
            ])
        }
        None => Line::from(Span::styled(text, base)),
    }
}

/// Char range of the match, or `None` when lowercasing changes the char count
fn match_range(text: &str, query: &str) -> Option<(usize, usize)> {
    if query.is_empty() {
        return None;
    }
    let haystack: Vec<char> = text.chars().flat_map(char::to_lowercase).collect();
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    if haystack.len() != text.chars().count() || needle.len() > haystack.len() {
        return None;
    }
    let start = haystack
        .windows(needle.len())
        .position(|window| window == needle.as_slice())?;
    Some((start, start + needle.len()))
}
