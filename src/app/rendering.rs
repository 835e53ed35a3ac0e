// Rendering - draw() and screen layout

use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
};

use super::{App, FocusArea};
use crate::chat::ViewportMetrics;
use crate::components::conversation_viewer::TranscriptView;
use crate::components::status_header::StatusHeader;
use crate::components::suggestion_popup::SuggestionPopup;
use crate::components::Component;
use crate::error::{ChatError, Result};

const CHIPS_HEIGHT: u16 = 2;
const INPUT_HEIGHT: u16 = 3;

/// Header, transcript, quick prompts, composer
fn split_screen(area: Rect) -> [Rect; 4] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(StatusHeader::HEIGHT),
            Constraint::Min(3),
            Constraint::Length(CHIPS_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3]]
}

impl<B: Backend> App<B> {
    /// Draw the whole screen and feed the transcript geometry back to the session
    pub(super) fn draw(&mut self) -> Result<()> {
        let Self {
            terminal,
            session,
            theme,
            show_timestamps,
            chat_input,
            viewer,
            chips,
            toasts,
            focus,
            ..
        } = self;

        let copy = session.copy();
        let view = TranscriptView {
            typing: session.is_pending().then_some(copy.typing),
            show_timestamps: *show_timestamps,
        };
        let input_focused = *focus == FocusArea::Input;
        let mut metrics = ViewportMetrics::default();

        terminal
            .draw(|frame| {
                let screen = frame.area();
                let [header, transcript, prompts, input] = split_screen(screen);

                StatusHeader::new(copy, session.is_online(), session.language()).render(frame, header, theme);

                metrics = viewer.render_transcript(frame, transcript, false, session.messages(), view, theme);

                chips.render(frame, prompts, *focus == FocusArea::Chips, theme);
                chat_input.render_input(frame, input, input_focused, theme);

                if input_focused {
                    SuggestionPopup::render(
                        frame,
                        input,
                        transcript,
                        session.suggestions(),
                        session.input(),
                        theme,
                    );
                }

                // Keep the status line visible under any notice
                let below_header = Rect {
                    y: transcript.y,
                    height: screen.height.saturating_sub(header.height),
                    ..screen
                };
                toasts.render(frame, below_header, theme);
            })
            .map_err(|e| ChatError::Terminal(e.to_string()))?;

        session.update_viewport(metrics);
        Ok(())
    }
}
