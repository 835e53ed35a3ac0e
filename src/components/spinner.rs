use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use std::time::{Duration, Instant};

/// Frame sets for the "agent is typing" indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinnerStyle {
    /// Three bouncing dots
    #[default]
    Dots,
    Braille,
    Line,
}

impl SpinnerStyle {
    pub fn frames(&self) -> &'static [&'static str] {
        match self {
            SpinnerStyle::Dots => &["●∙∙", "∙●∙", "∙∙●", "∙●∙"],
            SpinnerStyle::Braille => &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"],
            SpinnerStyle::Line => &["-", "\\", "|", "/"],
        }
    }

    pub fn frame_duration(&self) -> Duration {
        match self {
            SpinnerStyle::Dots => Duration::from_millis(200),
            SpinnerStyle::Braille => Duration::from_millis(80),
            SpinnerStyle::Line => Duration::from_millis(100),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dots" => Some(SpinnerStyle::Dots),
            "braille" => Some(SpinnerStyle::Braille),
            "line" => Some(SpinnerStyle::Line),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Spinner {
    style: SpinnerStyle,
    frame_index: usize,
    last_frame_time: Instant,
    color: Color,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new(SpinnerStyle::default())
    }
}

impl Spinner {
    pub fn new(style: SpinnerStyle) -> Self {
        Self {
            style,
            frame_index: 0,
            last_frame_time: Instant::now(),
            color: Color::Cyan,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Advance if the frame is due. Returns true when the frame changed.
    pub fn tick(&mut self) -> bool {
        if self.last_frame_time.elapsed() < self.style.frame_duration() {
            return false;
        }
        let frames = self.style.frames();
        self.frame_index = (self.frame_index + 1) % frames.len();
        self.last_frame_time = Instant::now();
        true
    }

    pub fn reset(&mut self) {
        self.frame_index = 0;
        self.last_frame_time = Instant::now();
    }

    pub fn current_frame(&self) -> &'static str {
        let frames = self.style.frames();
        frames[self.frame_index % frames.len()]
    }

    /// `<frame> <label>` as one line
    pub fn line(&self, label: &str) -> Line<'static> {
        Line::from(vec![
            Span::styled(self.current_frame(), Style::default().fg(self.color)),
            Span::raw(" "),
            Span::styled(
                label.to_string(),
                Style::default().fg(self.color).add_modifier(Modifier::ITALIC),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_waits_for_frame_duration() {
        let mut spinner = Spinner::new(SpinnerStyle::Dots);
        assert!(!spinner.tick());
        assert_eq!(spinner.current_frame(), "●∙∙");

        spinner.last_frame_time = Instant::now() - Duration::from_millis(250);
        assert!(spinner.tick());
        assert_eq!(spinner.current_frame(), "∙●∙");
    }

    #[test]
    fn test_frames_wrap() {
        let mut spinner = Spinner::new(SpinnerStyle::Line);
        for _ in 0..4 {
            spinner.last_frame_time = Instant::now() - Duration::from_secs(1);
            spinner.tick();
        }
        assert_eq!(spinner.current_frame(), "-");
    }

    #[test]
    fn test_reset() {
        let mut spinner = Spinner::new(SpinnerStyle::Braille);
        spinner.last_frame_time = Instant::now() - Duration::from_secs(1);
        spinner.tick();
        spinner.reset();
        assert_eq!(spinner.current_frame(), "⠋");
    }

    #[test]
    fn test_from_name() {
        assert_eq!(SpinnerStyle::from_name("dots"), Some(SpinnerStyle::Dots));
        assert_eq!(SpinnerStyle::from_name("moon"), None);
    }

    #[test]
    fn test_line_contains_label() {
        let spinner = Spinner::default();
        let line = spinner.line("Typing...");
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.ends_with("Typing..."));
    }
}
