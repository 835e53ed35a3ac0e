use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::chat::{Notice, NoticeLevel};
use crate::config::Theme;

const DEFAULT_DURATION_MS: u64 = 4000;
const MAX_VISIBLE_TOASTS: usize = 4;
const TOAST_WIDTH: u16 = 44;
const TOAST_MARGIN: u16 = 1;

fn level_icon(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "ℹ",
        NoticeLevel::Warning => "⚠",
        NoticeLevel::Error => "✖",
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub notice: Notice,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Toast {
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }

    fn remaining_ratio(&self) -> f32 {
        let elapsed = self.created_at.elapsed().as_millis() as f32;
        let total = self.duration.as_millis().max(1) as f32;
        (1.0 - elapsed / total).max(0.0)
    }

    fn body(&self) -> Paragraph<'_> {
        Paragraph::new(format!("{} {}", level_icon(self.notice.level), self.notice.text))
            .wrap(Wrap { trim: true })
    }
}

/// Stack of transient notices in the top-right corner
pub struct ToastManager {
    toasts: VecDeque<Toast>,
    duration: Duration,
}

impl ToastManager {
    pub fn new(duration: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            duration,
        }
    }

    pub fn push(&mut self, notice: Notice) {
        // Identical notice still on screen: restart its timer instead of stacking
        if let Some(existing) = self.toasts.iter_mut().find(|t| t.notice == notice) {
            existing.created_at = Instant::now();
            return;
        }

        self.toasts.push_back(Toast {
            notice,
            created_at: Instant::now(),
            duration: self.duration,
        });

        while self.toasts.len() > MAX_VISIBLE_TOASTS * 2 {
            self.toasts.pop_front();
        }
    }

    pub fn extend(&mut self, notices: impl IntoIterator<Item = Notice>) {
        for notice in notices {
            self.push(notice);
        }
    }

    /// Drop expired toasts. Returns true if any were removed.
    pub fn tick(&mut self) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| !t.is_expired());
        self.toasts.len() != before
    }

    pub fn dismiss_first(&mut self) {
        self.toasts.pop_front();
    }

    pub fn has_toasts(&self) -> bool {
        !self.toasts.is_empty()
    }

    #[cfg(test)]
    pub fn count(&self) -> usize {
        self.toasts.len()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().take(MAX_VISIBLE_TOASTS)
    }

    /// Stack toasts down the right edge of `area`
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if self.toasts.is_empty() {
            return;
        }

        let width = TOAST_WIDTH.min(area.width.saturating_sub(2));
        if width < 8 {
            return;
        }
        let x = area.x + area.width.saturating_sub(width + 1);
        let mut y = area.y + 1;

        for toast in self.visible() {
            // Borders plus the progress row
            let text_rows = toast.body().line_count(width.saturating_sub(2)) as u16;
            let height = text_rows + 3;
            if y + height > area.y + area.height {
                break;
            }

            self.render_toast(frame, Rect::new(x, y, width, height), toast, theme);
            y += height + TOAST_MARGIN;
        }

        if self.toasts.len() > MAX_VISIBLE_TOASTS && y < area.y + area.height {
            let more = format!("... and {} more", self.toasts.len() - MAX_VISIBLE_TOASTS);
            frame.render_widget(
                Paragraph::new(more)
                    .style(Style::default().fg(theme.colors.muted.to_color()))
                    .alignment(Alignment::Right),
                Rect::new(x, y, width, 1),
            );
        }
    }

    fn render_toast(&self, frame: &mut Frame, area: Rect, toast: &Toast, theme: &Theme) {
        frame.render_widget(Clear, area);

        let style = theme.notice_style(toast.notice.level);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .style(style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text_area = Rect {
            height: inner.height.saturating_sub(1),
            ..inner
        };
        frame.render_widget(toast.body().style(style.add_modifier(Modifier::BOLD)), text_area);

        let progress_width = ((inner.width as f32) * toast.remaining_ratio()) as usize;
        let progress = Line::from(Span::styled(
            "─".repeat(progress_width),
            style.add_modifier(Modifier::DIM),
        ));
        let bar_area = Rect {
            y: inner.y + inner.height.saturating_sub(1),
            height: 1,
            ..inner
        };
        frame.render_widget(Paragraph::new(progress), bar_area);
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DURATION_MS))
    }
}
